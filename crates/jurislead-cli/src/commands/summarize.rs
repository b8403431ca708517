//! `juris summarize` and `juris ocr`.

use std::path::PathBuf;

use anyhow::bail;
use chrono::{Local, Utc};
use clap::Args;
use jurislead_client::models::SummaryResponse;
use jurislead_client::{HistorySource, Upload, UploadKind};
use jurislead_core::{ActivityStatus, NewActivity};
use jurislead_store::LegacyHistoryItem;
use serde_json::json;
use tracing::{info, warn};

use super::{App, now_millis, write_download};
use crate::display;

#[derive(Debug, Args)]
pub struct SummarizeArgs {
    /// Text to summarize, when no file is given.
    pub text: Option<String>,
    /// PDF, DOC, DOCX, TXT, JPG, or PNG document (50MB max).
    #[arg(long, conflicts_with = "text")]
    pub file: Option<PathBuf>,
    /// Save the plain-text summary.
    #[arg(long)]
    pub download: bool,
    /// Summary path; defaults to `document-summary-<millis>.txt`.
    #[arg(short, long, requires = "download")]
    pub output: Option<PathBuf>,
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct OcrArgs {
    /// JPG, PNG, GIF, BMP, or WEBP image (10MB max).
    pub file: PathBuf,
    #[arg(long)]
    pub json: bool,
}

pub fn summary_title(file_name: Option<&str>) -> String {
    format!("Document Summary: {}", file_name.unwrap_or("Text Input"))
}

pub async fn run(app: &App, args: SummarizeArgs) -> anyhow::Result<()> {
    let text = args.text.as_deref().map(str::trim).unwrap_or_default();
    let (upload, file_mode) = match args.file.as_deref() {
        Some(path) => (Upload::from_path(path, UploadKind::Document).await?, true),
        None if !text.is_empty() => (Upload::text_document(text), false),
        None => bail!("Please provide either text input or upload a file"),
    };
    let file_name = file_mode.then(|| upload.name.clone());
    let file_meta = file_mode.then(|| (upload.size(), upload.mime));

    let response = app.api.summarize_document(upload).await?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        display::print_summary(&response.summary);
    }

    let input_mode = if file_mode { "file" } else { "text" };
    let title = summary_title(file_name.as_deref());
    let activity = NewActivity {
        activity_type: "document_summarization".to_string(),
        title: title.clone(),
        description: Some(format!(
            "Generated AI summary for {}",
            if file_mode { "uploaded file" } else { "text input" }
        )),
        status: Some(ActivityStatus::Success),
        result_data: Some(json!({
            "summary": response.summary,
            "metadata": response.metadata.clone().unwrap_or_else(|| json!({
                "word_count": 0,
                "character_count": text.chars().count(),
            })),
            "input_mode": input_mode,
        })),
        file_name: file_name.clone(),
        file_size: file_meta.map(|(size, _)| size),
        file_type: file_meta.map(|(_, mime)| mime.to_string()),
        page_url: Some("/summarizer".to_string()),
        additional_data: Some(json!({
            "document_type": response.summary.document_type,
            "urgency_level": response.summary.urgency_level,
            "language_complexity": response.summary.language_complexity,
        })),
        ..Default::default()
    };
    record(app, &activity, &response, file_name.as_deref()).await;

    if args.download {
        let report = display::summary_report(
            &response.summary,
            file_name.as_deref(),
            Local::now().date_naive(),
        );
        let default_name = format!("document-summary-{}.txt", now_millis());
        let path = write_download(args.output.as_deref(), &default_name, &report)?;
        println!("Summary saved to {}", path.display());
    }
    Ok(())
}

async fn record(app: &App, activity: &NewActivity, response: &SummaryResponse, file_name: Option<&str>) {
    let fallback = LegacyHistoryItem {
        id: now_millis().to_string(),
        kind: "summary".to_string(),
        title: activity.title.clone(),
        timestamp: Utc::now().to_rfc3339(),
        data: Some(json!({
            "file": file_name,
            "result": response,
        })),
        status: Some("completed".to_string()),
    };
    match app.history().record_activity(activity, &fallback).await {
        Ok(HistorySource::Remote) => info!("summary saved to history"),
        Ok(HistorySource::LocalFallback) => eprintln!("Summary saved to history on this device."),
        Err(e) => warn!(error = %e, "failed to save summary to history"),
    }
}

pub async fn ocr(app: &App, args: OcrArgs) -> anyhow::Result<()> {
    let upload = Upload::from_path(&args.file, UploadKind::Image).await?;
    let result = app.api.extract_text_from_image(upload).await?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        display::print_ocr(&result);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_names_file_or_text_input() {
        assert_eq!(summary_title(Some("lease.pdf")), "Document Summary: lease.pdf");
        assert_eq!(summary_title(None), "Document Summary: Text Input");
    }
}
