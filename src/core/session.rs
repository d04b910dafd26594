use chrono::{DateTime, FixedOffset, Utc};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::error::SessionError;
use crate::core::ledger::{TokenRates, UsageLedger};
use crate::core::message::{Message, Transcript};

/// One chat session: the transcript and its usage ledger, owned together and
/// passed around explicitly. Nothing here is shared or global.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub transcript: Transcript,
    pub ledger: UsageLedger,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    pub fn new(context: impl Into<String>, rates: TokenRates) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            transcript: Transcript::new(context),
            ledger: UsageLedger::new(rates),
            created_at: now,
            updated_at: now,
        }
    }

    /// Record one completed exchange: the user prompt, the assistant reply,
    /// and the token counts billed for the round-trip. The transcript is only
    /// touched once the token counts are accepted.
    pub fn record_exchange(
        &mut self,
        prompt: impl Into<String>,
        reply: impl Into<String>,
        prompt_tokens: i64,
        completion_tokens: i64,
    ) -> Result<(), SessionError> {
        self.ledger.record(prompt_tokens, completion_tokens)?;
        self.transcript.push_user(prompt);
        self.transcript.push_assistant(reply);
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Snapshot for export: totals and messages frozen at this instant,
    /// timestamped in the display timezone. Read-only; the session itself is
    /// left untouched.
    pub fn summary(&self, tz: Tz) -> TranscriptSummary {
        TranscriptSummary {
            timestamp: Utc::now().with_timezone(&tz).fixed_offset(),
            total_tokens: self.ledger.total_tokens(),
            total_cost: self.ledger.total_cost(),
            messages: self.transcript.messages().to_vec(),
        }
    }
}

/// Derived, read-only view of a session at export time.
#[derive(Debug, Clone, Serialize)]
pub struct TranscriptSummary {
    pub timestamp: DateTime<FixedOffset>,
    pub total_tokens: u64,
    pub total_cost: Decimal,
    pub messages: Vec<Message>,
}

/// One recorded round-trip through the external chat service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeRecord {
    pub prompt: String,
    pub reply: String,
    pub prompt_tokens: i64,
    pub completion_tokens: i64,
}

/// On-disk form of a finished session, as written by the chat frontend.
/// Replayed through [`Session`] to rebuild the ledger and transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionLog {
    pub context: String,
    pub exchanges: Vec<ExchangeRecord>,
}

impl SessionLog {
    pub fn from_json(json: &str) -> Result<Self, SessionError> {
        serde_json::from_str(json).map_err(|e| SessionError::Log(e.to_string()))
    }

    pub fn replay(&self, rates: TokenRates) -> Result<Session, SessionError> {
        let mut session = Session::new(self.context.clone(), rates);
        for exchange in &self.exchanges {
            session.record_exchange(
                exchange.prompt.clone(),
                exchange.reply.clone(),
                exchange.prompt_tokens,
                exchange.completion_tokens,
            )?;
        }
        Ok(session)
    }
}
