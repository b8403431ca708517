//! `juris analyze`: submit an incident and render the analysis.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, bail};
use chrono::{Local, NaiveDate, Utc};
use clap::{Args, ValueEnum};
use jurislead_client::upload::image_mime;
use jurislead_client::{ApiError, HistorySource, Upload, UploadKind, transform_analysis_response};
use jurislead_core::{
    ActivityStatus, AnalysisRequest, AnalysisResponse, AnalysisResult, ContactMethod, NewActivity,
    UrgencyLevel, UserType,
};
use jurislead_store::{LegacyHistoryItem, restore_analysis};
use serde_json::{Value, json};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::{App, now_millis, write_download};
use crate::display::{self, ReportInput};

pub const PROGRESS_STEPS: [&str; 6] = [
    "Connecting to AI analysis service...",
    "Processing case description...",
    "Analyzing applicable IPC sections...",
    "Determining case severity...",
    "Generating recommendations...",
    "Finalizing analysis report...",
];

const STEP_INTERVAL: Duration = Duration::from_secs(2);
const TITLE_CHARS: usize = 50;

const SLOW_ANALYSIS: &str = "Analysis is taking longer than expected. This may be due to complex case details. Please try again or simplify your description.";

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum UserTypeArg {
    Citizen,
    Lawyer,
    LawStudent,
    LegalAid,
}

impl From<UserTypeArg> for UserType {
    fn from(v: UserTypeArg) -> Self {
        match v {
            UserTypeArg::Citizen => Self::Citizen,
            UserTypeArg::Lawyer => Self::Lawyer,
            UserTypeArg::LawStudent => Self::LawStudent,
            UserTypeArg::LegalAid => Self::LegalAid,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ContactArg {
    Email,
    Telegram,
    Phone,
}

impl From<ContactArg> for ContactMethod {
    fn from(v: ContactArg) -> Self {
        match v {
            ContactArg::Email => Self::Email,
            ContactArg::Telegram => Self::Telegram,
            ContactArg::Phone => Self::Phone,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum UrgencyArg {
    Low,
    Medium,
    High,
    Critical,
}

impl From<UrgencyArg> for UrgencyLevel {
    fn from(v: UrgencyArg) -> Self {
        match v {
            UrgencyArg::Low => Self::Low,
            UrgencyArg::Medium => Self::Medium,
            UrgencyArg::High => Self::High,
            UrgencyArg::Critical => Self::Critical,
        }
    }
}

#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// Description of the incident.
    pub text: Option<String>,
    /// PDF, image, or plain-text file describing the incident.
    #[arg(long)]
    pub file: Option<PathBuf>,
    #[arg(long, value_enum, default_value = "citizen")]
    pub user_type: UserTypeArg,
    /// Date of the incident (YYYY-MM-DD).
    #[arg(long)]
    pub incident_date: Option<NaiveDate>,
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long)]
    pub city: Option<String>,
    #[arg(long)]
    pub state: Option<String>,
    #[arg(long, value_enum)]
    pub contact_method: Option<ContactArg>,
    #[arg(long)]
    pub contact_value: Option<String>,
    #[arg(long, value_enum)]
    pub urgency: Option<UrgencyArg>,
    /// Ask the backend to open a lead for lawyer matching.
    #[arg(long)]
    pub create_lead: bool,
    /// Save the plain-text report.
    #[arg(long)]
    pub download: bool,
    /// Report path; defaults to `juris-lead-analysis-<millis>.txt`.
    #[arg(short, long, requires = "download")]
    pub output: Option<PathBuf>,
    /// Print the analysis as JSON.
    #[arg(long)]
    pub json: bool,
    /// Re-open an analysis saved on this device instead of submitting one.
    #[arg(long, value_name = "ID", conflicts_with_all = ["text", "file", "create_lead"])]
    pub restore: Option<String>,
}

/// How the incident was supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Text,
    Pdf,
    Image,
    /// A plain-text file read as the description.
    TextFile,
}

impl InputKind {
    pub fn detect(file: Option<&Path>) -> Self {
        let Some(path) = file else {
            return Self::Text;
        };
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        let is_pdf = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));
        if is_pdf {
            Self::Pdf
        } else if image_mime(name).is_some() {
            Self::Image
        } else {
            Self::TextFile
        }
    }

    /// Input type label used in reports and history.
    pub fn label(self) -> &'static str {
        match self {
            Self::Text | Self::TextFile => "text",
            Self::Pdf => "pdf",
            Self::Image => "image",
        }
    }

    pub fn activity_type(self) -> &'static str {
        match self {
            Self::Text => "case_analysis",
            _ => "document_analysis",
        }
    }
}

/// Case description sent to the backend.
///
/// Text extracted from a file wins. A PDF or image without extracted text
/// is described by a placeholder naming the file.
pub fn case_description(kind: InputKind, file_name: &str, text: &str, extracted: Option<&str>) -> String {
    let text = text.trim();
    if let Some(extracted) = extracted.map(str::trim).filter(|t| !t.is_empty()) {
        return extracted.to_string();
    }
    match kind {
        InputKind::Pdf => format!(
            "[PDF File Upload: {file_name}] {}",
            if text.is_empty() { "PDF content analysis requested" } else { text }
        ),
        InputKind::Image => format!(
            "[Image File Upload: {file_name}] {}",
            if text.is_empty() { "Image content analysis requested" } else { text }
        ),
        InputKind::Text | InputKind::TextFile => text.to_string(),
    }
}

/// History title: the typed text cut to 50 characters, or the input type
/// and file name.
pub fn activity_title(kind: InputKind, text: &str, file_name: Option<&str>) -> String {
    if kind == InputKind::Text {
        if text.chars().count() > TITLE_CHARS {
            let head: String = text.chars().take(TITLE_CHARS).collect();
            format!("{head}...")
        } else {
            text.to_string()
        }
    } else {
        format!(
            "{} Analysis - {}",
            kind.label().to_uppercase(),
            file_name.unwrap_or("Unknown")
        )
    }
}

/// Print progress steps every two seconds, stopping one short of the last.
fn spawn_ticker() -> JoinHandle<()> {
    tokio::spawn(async {
        let mut interval = tokio::time::interval(STEP_INTERVAL);
        for step in &PROGRESS_STEPS[..PROGRESS_STEPS.len() - 1] {
            interval.tick().await;
            eprintln!("  {step}");
        }
    })
}

struct Submission {
    kind: InputKind,
    text: String,
    description: String,
    file: Option<FileMeta>,
}

struct FileMeta {
    name: String,
    size: u64,
    mime: Option<&'static str>,
}

async fn collect_input(app: &App, args: &AnalyzeArgs) -> anyhow::Result<Submission> {
    let text = args.text.clone().unwrap_or_default();
    let kind = InputKind::detect(args.file.as_deref());
    let Some(path) = args.file.as_deref() else {
        if text.trim().is_empty() {
            bail!("Please enter a description of your incident");
        }
        let description = case_description(kind, "", &text, None);
        return Ok(Submission {
            kind,
            text,
            description,
            file: None,
        });
    };

    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload")
        .to_string();
    let size = tokio::fs::metadata(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?
        .len();

    let (extracted, mime) = match kind {
        InputKind::Image => {
            let upload = Upload::from_path(path, UploadKind::Image).await?;
            let mime = upload.mime;
            match app.api.extract_text_from_image(upload).await {
                Ok(ocr) => {
                    info!(
                        chars = ocr.extracted_text.len(),
                        confidence = ocr.confidence,
                        "image text extracted"
                    );
                    (Some(ocr.extracted_text), Some(mime))
                }
                Err(e) => {
                    warn!(error = %e, "image text extraction failed, sending file reference");
                    (None, Some(mime))
                }
            }
        }
        InputKind::TextFile => {
            let contents = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("reading {}", path.display()))?;
            (Some(contents), Some("text/plain"))
        }
        InputKind::Pdf => (None, Some("application/pdf")),
        InputKind::Text => (None, None),
    };

    let description = case_description(kind, &name, &text, extracted.as_deref());
    if description.trim().is_empty() {
        bail!("Please select a file to analyze");
    }
    Ok(Submission {
        kind,
        text,
        description,
        file: Some(FileMeta { name, size, mime }),
    })
}

impl AnalyzeArgs {
    fn request(&self, description: String) -> AnalysisRequest {
        AnalysisRequest {
            user_type: self.user_type.into(),
            incident_date: self.incident_date,
            incident_location: self.location.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            contact_method: self.contact_method.map(Into::into),
            contact_value: self.contact_value.clone(),
            urgency_level: self.urgency.map(Into::into),
            create_lead: self.create_lead,
            ..AnalysisRequest::new(description)
        }
    }
}

pub async fn run(app: &App, args: AnalyzeArgs) -> anyhow::Result<()> {
    if let Some(id) = &args.restore {
        return restore(app, id, &args);
    }
    let input = collect_input(app, &args).await?;
    let request = args.request(input.description.clone());

    let ticker = spawn_ticker();
    let outcome = app.api.analyze_case(&request).await;
    ticker.abort();

    let response = match outcome {
        Ok(response) => response,
        Err(e) => {
            record_failure(app, &input, &e).await;
            if e.status() == Some(408) {
                bail!(SLOW_ANALYSIS);
            }
            return Err(e.into());
        }
    };
    eprintln!("  {}", PROGRESS_STEPS[PROGRESS_STEPS.len() - 1]);

    let result = transform_analysis_response(&response);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        display::print_analysis(&result);
    }

    record_success(app, &input, &result, &response).await;

    if args.download {
        let report = display::analysis_report(
            &ReportInput {
                input_type: input.kind.label(),
                file_name: input.file.as_ref().map(|f| f.name.as_str()),
                text: &input.text,
            },
            &result,
            Local::now().date_naive(),
        );
        let default_name = format!("juris-lead-analysis-{}.txt", now_millis());
        let path = write_download(args.output.as_deref(), &default_name, &report)?;
        println!("Report saved to {}", path.display());
    }
    Ok(())
}

/// Show a past analysis from the device history without calling the backend.
fn restore(app: &App, id: &str, args: &AnalyzeArgs) -> anyhow::Result<()> {
    let Some(saved) = restore_analysis(&app.storage, id).context("reading saved history")? else {
        bail!("no saved analysis with id {id} on this device");
    };
    let text = saved.input.unwrap_or_default();
    let Some(result) = saved.result else {
        println!("Restored input for {:?}:", saved.title);
        println!("{text}");
        bail!("the saved result could not be read; submit the analysis again");
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("Restored {:?}", saved.title);
        if !text.is_empty() {
            println!("{text}");
        }
        println!();
        display::print_analysis(&result);
    }
    if args.download {
        let report = display::analysis_report(
            &ReportInput {
                input_type: InputKind::Text.label(),
                file_name: None,
                text: &text,
            },
            &result,
            Local::now().date_naive(),
        );
        let default_name = format!("juris-lead-analysis-{}.txt", now_millis());
        let path = write_download(args.output.as_deref(), &default_name, &report)?;
        println!("Report saved to {}", path.display());
    }
    Ok(())
}

fn new_activity(input: &Submission, status: ActivityStatus, description: String) -> NewActivity {
    let file = input.file.as_ref();
    NewActivity {
        activity_type: input.kind.activity_type().to_string(),
        title: activity_title(input.kind, &input.text, file.map(|f| f.name.as_str())),
        description: Some(description),
        status: Some(status),
        file_name: file.map(|f| f.name.clone()),
        file_size: file.map(|f| f.size),
        file_type: file.and_then(|f| f.mime).map(str::to_string),
        ..Default::default()
    }
}

async fn record_success(
    app: &App,
    input: &Submission,
    result: &AnalysisResult,
    response: &AnalysisResponse,
) {
    let label = input.kind.label();
    let activity = NewActivity {
        result_data: Some(json!({
            "input_type": label,
            "case_description": input.description,
            "analysis_result": result,
            "backend_response": response,
            "severity": result.severity,
            "case_type": result.case_type,
            "sections_count": result.applicable_sections.len(),
            "defensive_sections_count": result.defensive_sections.as_ref().map_or(0, Vec::len),
            "recommendations_count": result.recommendations.len(),
        })),
        additional_data: Some(json!({
            "input_method": label,
            "text_length": input.text.chars().count(),
            "completed_steps": PROGRESS_STEPS.len(),
        })),
        ..new_activity(
            input,
            ActivityStatus::Success,
            format!("Legal analysis completed for {label} input"),
        )
    };
    let millis = now_millis();
    let fallback = LegacyHistoryItem {
        id: millis.to_string(),
        kind: "analysis".to_string(),
        title: activity.title.clone(),
        timestamp: Utc::now().to_rfc3339(),
        data: Some(json!({
            "input": input.text,
            "file": input.file.as_ref().map(|f| f.name.as_str()),
            "result": result,
            "inputType": label,
            "backendResponse": response,
        })),
        status: Some("completed".to_string()),
    };
    match app.history().record_activity(&activity, &fallback).await {
        Ok(HistorySource::Remote) => info!("analysis saved to history"),
        Ok(HistorySource::LocalFallback) => eprintln!("Analysis saved to history on this device."),
        Err(e) => warn!(error = %e, "failed to save analysis to history"),
    }
}

/// Track a failed analysis remotely. Failures here are only logged.
async fn record_failure(app: &App, input: &Submission, error: &ApiError) {
    let label = input.kind.label();
    let activity = NewActivity {
        result_data: Some(json!({
            "error_message": error.to_string(),
            "input_type": label,
        })),
        additional_data: Some(json!({
            "error_type": "api_error",
            "error_status": error.status().map_or(Value::Null, Value::from),
        })),
        ..new_activity(
            input,
            ActivityStatus::Failed,
            format!("Legal analysis failed for {label} input"),
        )
    };
    if let Err(e) = app.api.create_activity(&activity).await {
        warn!(error = %e, "error tracking failed analysis");
    }
}
