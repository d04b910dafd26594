use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::core::error::LedgerError;

/// Per-token prices in dollars. Decimal end to end so accumulated cost never
/// picks up float drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRates {
    pub cost_per_input_token: Decimal,
    pub cost_per_output_token: Decimal,
}

impl Default for TokenRates {
    fn default() -> Self {
        // gpt-3.5-turbo pricing: $0.0010 / $0.0020 per 1K tokens.
        Self {
            cost_per_input_token: dec!(0.0000010),
            cost_per_output_token: dec!(0.0000020),
        }
    }
}

/// Running accumulation of token usage across a session, priced at fixed
/// rates. Owned by the session and mutated only through [`record`].
///
/// [`record`]: UsageLedger::record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageLedger {
    prompt_tokens: u64,
    completion_tokens: u64,
    rates: TokenRates,
}

impl UsageLedger {
    pub fn new(rates: TokenRates) -> Self {
        Self {
            prompt_tokens: 0,
            completion_tokens: 0,
            rates,
        }
    }

    /// Add the token counts billed for one completed exchange.
    ///
    /// Negative counts are rejected and leave the totals untouched.
    pub fn record(&mut self, prompt_tokens: i64, completion_tokens: i64) -> Result<(), LedgerError> {
        if prompt_tokens < 0 || completion_tokens < 0 {
            return Err(LedgerError::InvalidTokenCount {
                prompt_tokens,
                completion_tokens,
            });
        }

        let new_prompt = self
            .prompt_tokens
            .checked_add(prompt_tokens as u64)
            .ok_or(LedgerError::Overflow)?;
        let new_completion = self
            .completion_tokens
            .checked_add(completion_tokens as u64)
            .ok_or(LedgerError::Overflow)?;

        self.prompt_tokens = new_prompt;
        self.completion_tokens = new_completion;
        Ok(())
    }

    pub fn prompt_tokens(&self) -> u64 {
        self.prompt_tokens
    }

    pub fn completion_tokens(&self) -> u64 {
        self.completion_tokens
    }

    pub fn rates(&self) -> &TokenRates {
        &self.rates
    }

    pub fn total_tokens(&self) -> u64 {
        self.prompt_tokens.saturating_add(self.completion_tokens)
    }

    /// Total dollar cost of the session so far. Deterministic in the counters
    /// and rates, independent of how the recording calls were interleaved.
    pub fn total_cost(&self) -> Decimal {
        Decimal::from(self.prompt_tokens) * self.rates.cost_per_input_token
            + Decimal::from(self.completion_tokens) * self.rates.cost_per_output_token
    }
}

impl Default for UsageLedger {
    fn default() -> Self {
        Self::new(TokenRates::default())
    }
}
