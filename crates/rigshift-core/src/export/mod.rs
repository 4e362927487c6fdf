mod pdf;
mod text;

pub use pdf::render_pdf;
pub use text::render_text;

use serde::{Deserialize, Serialize};

use crate::tutorial::TutorialResponse;

pub const TEXT_FILE_NAME: &str = "pc-upgrade-guide.txt";
pub const PDF_FILE_NAME: &str = "pc-upgrade-guide.pdf";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Text,
    Pdf,
}

/// A downloadable rendering of a tutorial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedDocument {
    pub file_name: &'static str,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

pub fn export(response: &TutorialResponse, format: ExportFormat) -> ExportedDocument {
    match format {
        ExportFormat::Text => ExportedDocument {
            file_name: TEXT_FILE_NAME,
            mime_type: "text/plain;charset=utf-8",
            bytes: render_text(response).into_bytes(),
        },
        ExportFormat::Pdf => ExportedDocument {
            file_name: PDF_FILE_NAME,
            mime_type: "application/pdf",
            bytes: render_pdf(response),
        },
    }
}
