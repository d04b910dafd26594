pub mod config;
pub mod error;
pub mod ledger;
pub mod message;
pub mod moderation;
pub mod prompt;
pub mod session;

#[cfg(test)]
mod tests;
