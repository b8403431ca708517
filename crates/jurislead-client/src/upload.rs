//! Local checks and packaging for file uploads.

use std::path::Path;

use reqwest::multipart::{Form, Part};

use crate::ApiError;

const MB: u64 = 1024 * 1024;

pub const MAX_IMAGE_BYTES: u64 = 10 * MB;
pub const MAX_DOCUMENT_BYTES: u64 = 50 * MB;

/// What an upload is for; decides the size limit and accepted formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    /// Image sent for OCR.
    Image,
    /// Document sent to the summarizer.
    Document,
}

const IMAGE_TYPES: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("bmp", "image/bmp"),
    ("webp", "image/webp"),
];

const DOCUMENT_TYPES: &[(&str, &str)] = &[
    ("pdf", "application/pdf"),
    ("doc", "application/msword"),
    (
        "docx",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    ),
    ("txt", "text/plain"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
];

impl UploadKind {
    fn accepted(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::Image => IMAGE_TYPES,
            Self::Document => DOCUMENT_TYPES,
        }
    }

    fn max_bytes(self) -> u64 {
        match self {
            Self::Image => MAX_IMAGE_BYTES,
            Self::Document => MAX_DOCUMENT_BYTES,
        }
    }
}

/// MIME type for a file name by extension, if it is an accepted image.
pub fn image_mime(name: &str) -> Option<&'static str> {
    mime_for(name, IMAGE_TYPES)
}

fn mime_for(name: &str, table: &[(&str, &'static str)]) -> Option<&'static str> {
    let ext = Path::new(name)
        .extension()?
        .to_str()?
        .to_ascii_lowercase();
    table.iter().find(|(e, _)| *e == ext).map(|(_, m)| *m)
}

/// Check size and format before anything is sent. Returns the MIME type.
pub fn validate(name: &str, size: u64, kind: UploadKind) -> Result<&'static str, ApiError> {
    if size > kind.max_bytes() {
        return Err(ApiError::Extraction(format!(
            "File size exceeds {}MB limit",
            kind.max_bytes() / MB
        )));
    }
    mime_for(name, kind.accepted()).ok_or_else(|| {
        let allowed: Vec<&str> = kind.accepted().iter().map(|(e, _)| *e).collect();
        ApiError::Extraction(format!(
            "Unsupported file format. Allowed: {}",
            allowed.join(", ")
        ))
    })
}

/// A validated file held in memory, ready for a multipart request.
#[derive(Debug, Clone)]
pub struct Upload {
    pub name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub async fn from_path(path: &Path, kind: UploadKind) -> Result<Self, ApiError> {
        let io_err = |source| ApiError::Io {
            path: path.to_path_buf(),
            source,
        };
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();
        let size = tokio::fs::metadata(path).await.map_err(io_err)?.len();
        let mime = validate(&name, size, kind)?;
        let bytes = tokio::fs::read(path).await.map_err(io_err)?;
        Ok(Self { name, mime, bytes })
    }

    /// Wrap pasted text as a plain-text document.
    pub fn text_document(text: &str) -> Self {
        Self {
            name: "document.txt".to_string(),
            mime: "text/plain",
            bytes: text.as_bytes().to_vec(),
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub(crate) fn into_form(self, field: &'static str) -> Result<Form, ApiError> {
        let part = Part::bytes(self.bytes)
            .file_name(self.name)
            .mime_str(self.mime)
            .map_err(|e| ApiError::Extraction(format!("Invalid upload type: {e}")))?;
        Ok(Form::new().part(field, part))
    }
}
