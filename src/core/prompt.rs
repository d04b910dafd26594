use std::fmt;

use serde::{Deserialize, Serialize};

/// Response length cap given to the assistant, in words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ResponseLength {
    Small,
    Medium,
    Large,
}

impl ResponseLength {
    pub fn max_words(&self) -> u32 {
        match self {
            Self::Small => 300,
            Self::Medium => 600,
            Self::Large => 900,
        }
    }
}

/// Writing style the assistant is asked to answer in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStyle {
    Expository,
    Ornate,
    Narrative,
    Creative,
    Objective,
    Pragmatic,
    Systematic,
    Playful,
}

impl fmt::Display for ResponseStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Expository => "expository",
            Self::Ornate => "ornate",
            Self::Narrative => "narrative",
            Self::Creative => "creative",
            Self::Objective => "objective",
            Self::Pragmatic => "pragmatic",
            Self::Systematic => "systematic",
            Self::Playful => "playful",
        };
        write!(f, "{s}")
    }
}

/// Assemble the system/context message: assistant persona, style and length
/// instructions, and the uploaded reference document when one was provided.
pub fn build_context(
    style: ResponseStyle,
    length: ResponseLength,
    document: Option<&str>,
) -> String {
    let mut context = format!(
        "You are a personal assistant whose goal is to answer the user's \
         questions in a {style} writing style. Limit the response length to \
         at most {} words.",
        length.max_words()
    );

    if let Some(doc) = document.filter(|d| !d.is_empty()) {
        context.push_str(
            "\n\nWhen answering the user's messages, take the following content into account:\n\n",
        );
        context.push_str(doc);
        context.push('\n');
    }

    context
}
