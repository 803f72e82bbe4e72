//! Example: Analyze one transcript and print the decision.
//!
//! Run with: cargo run -p turnwise-turn --example analyze_transcript -- "What time is it?" 500 [lang]

use turnwise_turn::{AnalyzerConfig, TurnAnalyzer};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter("turnwise_turn=debug,turnwise_signals=trace")
        .init();

    let mut args = std::env::args().skip(1);
    let Some(text) = args.next() else {
        eprintln!("usage: analyze_transcript <text> <silence_ms> [lang]");
        std::process::exit(2);
    };
    let silence_ms: i64 = match args.next().map(|s| s.parse()) {
        Some(Ok(ms)) => ms,
        Some(Err(e)) => {
            eprintln!("silence_ms: {e}");
            std::process::exit(2);
        }
        None => 0,
    };

    let mut config = AnalyzerConfig::default();
    if let Some(lang) = args.next() {
        config = config.with_language(lang);
    }

    let mut analyzer = match TurnAnalyzer::with_config(config) {
        Ok(analyzer) => analyzer,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    match analyzer.analyze(&text, silence_ms, None) {
        Ok(result) => match serde_json::to_string_pretty(&result) {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("failed to serialize result: {e}"),
        },
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
