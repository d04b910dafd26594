pub mod download;
pub mod pdf;

pub use download::{encode_for_download, DownloadPayload};
pub use pdf::TranscriptExporter;

#[cfg(test)]
mod tests;
