use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use super::download::{encode_for_download, PDF_MIME_TYPE};
use super::pdf::{text_width_mm, wrap_text, TranscriptExporter};
use crate::core::message::Message;

fn assert_valid_pdf(bytes: &[u8]) {
    assert!(bytes.len() > 100, "document suspiciously small");
    assert!(bytes.starts_with(b"%PDF"), "missing PDF header");
    let tail = &bytes[bytes.len().saturating_sub(64)..];
    assert!(
        tail.windows(5).any(|w| w == b"%%EOF"),
        "missing PDF trailer"
    );
}

#[test]
fn test_render_empty_transcript() {
    let exporter = TranscriptExporter::default();
    let doc = exporter.render(&[]).unwrap();
    assert_valid_pdf(&doc);
}

#[test]
fn test_render_two_messages() {
    let exporter = TranscriptExporter::default();
    let empty = exporter.render(&[]).unwrap();
    let doc = exporter
        .render(&[Message::user("hi"), Message::assistant("hello")])
        .unwrap();

    assert_valid_pdf(&doc);
    assert!(doc.len() > empty.len(), "rows should add content");
}

#[test]
fn test_render_long_content_paginates() {
    let exporter = TranscriptExporter::default();
    let short = exporter.render(&[Message::user("hi")]).unwrap();

    // Far more lines than fit on one landscape page; the row must split
    // across page breaks instead of overflowing or erroring.
    let long = "word ".repeat(20_000);
    let doc = exporter
        .render(&[Message::system("ctx"), Message::user(long)])
        .unwrap();

    assert_valid_pdf(&doc);
    assert!(doc.len() > short.len() * 4);
}

#[test]
fn test_render_handles_odd_content() {
    let exporter = TranscriptExporter::default();
    let doc = exporter
        .render(&[
            Message::user("tabs\tand\r\nreturns\u{0007}"),
            Message::assistant(""),
            Message::user("x".repeat(3_000)),
        ])
        .unwrap();
    assert_valid_pdf(&doc);
}

#[test]
fn test_wrap_respects_width() {
    let text = "the quick brown fox jumps over the lazy dog ".repeat(20);
    let width = 50.0;
    let lines = wrap_text(&text, width, 9.0);

    assert!(lines.len() > 1);
    for line in &lines {
        assert!(
            text_width_mm(line, 9.0) <= width,
            "line overflows cell: {line:?}"
        );
    }
}

#[test]
fn test_wrap_preserves_word_order() {
    let lines = wrap_text("alpha beta gamma delta", 1000.0, 9.0);
    assert_eq!(lines, vec!["alpha beta gamma delta"]);
}

#[test]
fn test_wrap_honors_newlines() {
    let lines = wrap_text("first\n\nsecond", 1000.0, 9.0);
    assert_eq!(lines, vec!["first", "", "second"]);
}

#[test]
fn test_wrap_hard_splits_unbroken_token() {
    let token = "a".repeat(500);
    let width = 40.0;
    let lines = wrap_text(&token, width, 9.0);

    assert!(lines.len() > 1);
    for line in &lines {
        assert!(text_width_mm(line, 9.0) <= width);
    }
    let rejoined: String = lines.concat();
    assert_eq!(rejoined, token);
}

#[test]
fn test_wrap_empty_input() {
    assert_eq!(wrap_text("", 40.0, 9.0), vec![String::new()]);
}

#[test]
fn test_encode_for_download_round_trip() {
    let exporter = TranscriptExporter::default();
    let doc = exporter.render(&[Message::user("hi")]).unwrap();

    let payload = encode_for_download(&doc, "hist_conversa.pdf");
    assert_eq!(payload.mime_type, PDF_MIME_TYPE);
    assert_eq!(payload.filename, "hist_conversa.pdf");

    let decoded = STANDARD.decode(&payload.base64_payload).unwrap();
    assert_eq!(decoded, doc);
}

#[test]
fn test_download_link_embeds_data_uri() {
    let payload = encode_for_download(b"binary", "t.pdf");
    let link = payload.html_link("Download");
    assert!(link.starts_with("<a href=\"data:application/pdf;base64,"));
    assert!(link.contains("download=\"t.pdf\""));
    assert!(link.ends_with(">Download</a>"));
}
