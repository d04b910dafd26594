use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serialize;

pub const PDF_MIME_TYPE: &str = "application/pdf";

/// Everything the download/transfer layer needs to hand the document to the
/// user: mime type, base64 body, and a suggested filename.
#[derive(Debug, Clone, Serialize)]
pub struct DownloadPayload {
    pub mime_type: String,
    pub base64_payload: String,
    pub filename: String,
}

impl DownloadPayload {
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64_payload)
    }

    /// An `<a download>` link embedding the whole document, the way the chat
    /// frontend surfaces the export.
    pub fn html_link(&self, label: &str) -> String {
        format!(
            "<a href=\"{}\" download=\"{}\">{}</a>",
            self.data_uri(),
            self.filename,
            label
        )
    }
}

/// Pure and stateless; the only failure mode is allocation.
pub fn encode_for_download(document: &[u8], filename: &str) -> DownloadPayload {
    DownloadPayload {
        mime_type: PDF_MIME_TYPE.into(),
        base64_payload: STANDARD.encode(document),
        filename: filename.to_string(),
    }
}
