use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChatLedgerError {
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Transcript error: {0}")]
    Transcript(#[from] TranscriptError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Invalid token count (prompt={prompt_tokens}, completion={completion_tokens}): counts must be non-negative")]
    InvalidTokenCount {
        prompt_tokens: i64,
        completion_tokens: i64,
    },

    #[error("Token counter overflow")]
    Overflow,
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("PDF generation failed: {0}")]
    Pdf(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranscriptError {
    #[error("Transcript is empty: the system/context message must come first")]
    Empty,

    #[error("Transcript must start with the system/context message, found role '{0}'")]
    MissingContext(String),
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Session log error: {0}")]
    Log(String),

    #[error("Invalid exchange: {0}")]
    InvalidExchange(#[from] LedgerError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file error: {0}")]
    File(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),
}
