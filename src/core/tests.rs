use rust_decimal_macros::dec;

use super::config::AppConfig;
use super::error::LedgerError;
use super::ledger::{TokenRates, UsageLedger};
use super::message::{Message, MessageRole, Transcript};
use super::moderation::{self, CategoryScore, Verdict};
use super::prompt::{build_context, ResponseLength, ResponseStyle};
use super::session::{Session, SessionLog};

fn test_rates() -> TokenRates {
    TokenRates {
        cost_per_input_token: dec!(0.0000010),
        cost_per_output_token: dec!(0.0000020),
    }
}

#[test]
fn test_ledger_accumulates() {
    let mut ledger = UsageLedger::new(test_rates());
    ledger.record(10, 5).unwrap();
    ledger.record(20, 15).unwrap();

    assert_eq!(ledger.prompt_tokens(), 30);
    assert_eq!(ledger.completion_tokens(), 20);
    assert_eq!(ledger.total_tokens(), 50);
}

#[test]
fn test_ledger_cost_example() {
    let mut ledger = UsageLedger::new(test_rates());
    ledger.record(100, 50).unwrap();

    assert_eq!(ledger.total_cost(), dec!(0.0002));
}

#[test]
fn test_ledger_cost_is_order_independent() {
    let mut a = UsageLedger::new(test_rates());
    a.record(7, 0).unwrap();
    a.record(0, 13).unwrap();
    a.record(100, 200).unwrap();

    let mut b = UsageLedger::new(test_rates());
    b.record(100, 200).unwrap();
    b.record(0, 13).unwrap();
    b.record(7, 0).unwrap();

    assert_eq!(a.total_tokens(), b.total_tokens());
    assert_eq!(a.total_cost(), b.total_cost());
}

#[test]
fn test_ledger_rejects_negative_counts() {
    let mut ledger = UsageLedger::new(test_rates());
    ledger.record(100, 50).unwrap();

    let err = ledger.record(-1, 0).unwrap_err();
    assert!(matches!(err, LedgerError::InvalidTokenCount { .. }));

    // Totals untouched by the failed call.
    assert_eq!(ledger.total_tokens(), 150);
    assert_eq!(ledger.total_cost(), dec!(0.0002));

    assert!(ledger.record(0, -5).is_err());
    assert_eq!(ledger.total_tokens(), 150);
}

#[test]
fn test_ledger_no_float_drift() {
    let mut ledger = UsageLedger::new(test_rates());
    for _ in 0..10_000 {
        ledger.record(1, 1).unwrap();
    }
    assert_eq!(ledger.total_cost(), dec!(0.03));
}

#[test]
fn test_transcript_starts_with_context() {
    let mut transcript = Transcript::new("You are a helpful assistant.");
    transcript.push_user("hi");
    transcript.push_assistant("hello");

    assert_eq!(transcript.len(), 3);
    assert_eq!(transcript.context().role, MessageRole::System);
    assert_eq!(transcript.exchanges().len(), 2);
    assert_eq!(transcript.exchanges()[0].role, MessageRole::User);
    assert_eq!(transcript.exchanges()[1].role, MessageRole::Assistant);
}

#[test]
fn test_transcript_round_trips_through_json() {
    let mut transcript = Transcript::new("context");
    transcript.push_user("hi");
    transcript.push_assistant("hello");

    let json = serde_json::to_string(&transcript).unwrap();
    let back: Transcript = serde_json::from_str(&json).unwrap();

    assert_eq!(back.messages(), transcript.messages());
    assert_eq!(back.context().role, MessageRole::System);
    assert_eq!(back.exchanges().len(), 2);
}

#[test]
fn test_transcript_rejects_empty_json() {
    let result = serde_json::from_str::<Transcript>(r#"{"messages": []}"#);
    let err = result.unwrap_err().to_string();
    assert!(err.contains("system/context message"), "unexpected error: {err}");
}

#[test]
fn test_transcript_rejects_json_without_leading_context() {
    let result = serde_json::from_str::<Transcript>(
        r#"{"messages": [{"role": "user", "content": "hi"}]}"#,
    );
    assert!(result.is_err());
}

#[test]
fn test_role_labels() {
    assert_eq!(MessageRole::System.label(), "system");
    assert_eq!(MessageRole::User.to_string(), "user");
    assert_eq!(
        serde_json::to_string(&MessageRole::Assistant).unwrap(),
        "\"assistant\""
    );
}

#[test]
fn test_session_records_exchanges() {
    let mut session = Session::new("context", test_rates());
    session.record_exchange("hi", "hello", 12, 8).unwrap();
    session.record_exchange("more?", "sure", 20, 30).unwrap();

    assert_eq!(session.transcript.len(), 5);
    assert_eq!(session.ledger.total_tokens(), 70);
}

#[test]
fn test_session_rejects_bad_exchange_without_touching_transcript() {
    let mut session = Session::new("context", test_rates());
    assert!(session.record_exchange("hi", "hello", -3, 8).is_err());

    assert_eq!(session.transcript.len(), 1);
    assert_eq!(session.ledger.total_tokens(), 0);
}

#[test]
fn test_summary_matches_ledger_at_snapshot_time() {
    let mut session = Session::new("context", test_rates());
    session.record_exchange("hi", "hello", 100, 50).unwrap();

    let summary = session.summary(chrono_tz::America::Sao_Paulo);
    assert_eq!(summary.total_tokens, session.ledger.total_tokens());
    assert_eq!(summary.total_cost, dec!(0.0002));
    assert_eq!(summary.messages.len(), 3);
    assert_eq!(summary.messages[0], Message::system("context"));
}

#[test]
fn test_session_log_replay() {
    let json = r#"{
        "context": "You are a personal assistant.",
        "exchanges": [
            {"prompt": "hi", "reply": "hello", "prompt_tokens": 10, "completion_tokens": 5},
            {"prompt": "bye", "reply": "see you", "prompt_tokens": 8, "completion_tokens": 4}
        ]
    }"#;

    let log = SessionLog::from_json(json).unwrap();
    let session = log.replay(test_rates()).unwrap();

    assert_eq!(session.transcript.len(), 5);
    assert_eq!(session.ledger.prompt_tokens(), 18);
    assert_eq!(session.ledger.completion_tokens(), 9);
}

#[test]
fn test_session_log_rejects_garbage() {
    assert!(SessionLog::from_json("not json").is_err());
}

#[test]
fn test_build_context_mentions_style_and_limit() {
    let context = build_context(ResponseStyle::Narrative, ResponseLength::Medium, None);
    assert!(context.contains("narrative"));
    assert!(context.contains("600 words"));
    assert!(!context.contains("following content"));
}

#[test]
fn test_build_context_embeds_document() {
    let context = build_context(
        ResponseStyle::Objective,
        ResponseLength::Small,
        Some("The capital of Bahia is Salvador."),
    );
    assert!(context.contains("take the following content into account"));
    assert!(context.contains("Salvador"));
}

#[test]
fn test_build_context_skips_empty_document() {
    let context = build_context(ResponseStyle::Objective, ResponseLength::Small, Some(""));
    assert!(!context.contains("following content"));
}

#[test]
fn test_moderation_allows_low_scores() {
    let scores = vec![
        CategoryScore { category: "hate".into(), score: 0.0004 },
        CategoryScore { category: "violence".into(), score: 0.009 },
    ];
    assert_eq!(moderation::evaluate(&scores), Verdict::Allowed);
}

#[test]
fn test_moderation_flags_and_reports_top_categories() {
    let scores = vec![
        CategoryScore { category: "a".into(), score: 0.002 },
        CategoryScore { category: "b".into(), score: 0.9 },
        CategoryScore { category: "c".into(), score: 0.5 },
        CategoryScore { category: "d".into(), score: 0.03 },
        CategoryScore { category: "e".into(), score: 0.2 },
        CategoryScore { category: "f".into(), score: 0.1 },
        CategoryScore { category: "g".into(), score: 0.07 },
    ];

    match moderation::evaluate(&scores) {
        Verdict::Flagged { categories } => {
            assert_eq!(categories, vec!["b", "c", "e", "f", "g"]);
        }
        Verdict::Allowed => panic!("expected flagged verdict"),
    }
}

#[test]
fn test_moderation_empty_scores_allowed() {
    assert_eq!(moderation::evaluate(&[]), Verdict::Allowed);
}

#[test]
fn test_config_defaults() {
    let config = AppConfig::default();
    assert_eq!(config.timezone, "America/Sao_Paulo");
    assert_eq!(config.pricing.cost_per_input_token, dec!(0.0000010));
    assert_eq!(config.pricing.cost_per_output_token, dec!(0.0000020));
    assert_eq!(config.export.filename, "chat_transcript.pdf");
    assert!(config.export.include_context);
    assert!(config.timezone().is_ok());
}

#[test]
fn test_config_from_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("chatledger.json"),
        r#"{
            "timezone": "UTC",
            "pricing": {
                "cost_per_input_token": "0.000002",
                "cost_per_output_token": "0.000004"
            },
            "export": {"filename": "out.pdf", "include_context": false}
        }"#,
    )
    .unwrap();

    let config = super::config::load_config(Some(dir.path().to_path_buf())).unwrap();
    assert_eq!(config.timezone, "UTC");
    assert_eq!(config.pricing.cost_per_input_token, dec!(0.000002));
    assert!(!config.export.include_context);
}

#[test]
fn test_config_rejects_unknown_timezone() {
    let config = AppConfig {
        timezone: "Mars/Olympus_Mons".into(),
        ..AppConfig::default()
    };
    assert!(config.timezone().is_err());
}
