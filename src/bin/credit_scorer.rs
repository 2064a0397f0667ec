//! Credit Scorer Binary - Batch Wallet Credit Scoring
//!
//! Loads a lending-protocol ledger, aggregates per-wallet features, scores
//! every wallet on 0-1000, prints the score distribution and persists both
//! tables.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release --bin credit_scorer -- --input user-wallet-transactions.json --backend csv
//! ```
//!
//! ## Environment Variables
//!
//! - CREDIT_INPUT_PATH - Ledger file, JSON array or JSONL (default: user-wallet-transactions.json)
//! - CREDIT_OUTPUT_DIR - Output directory for CSV backend (default: output)
//! - CREDIT_DB_PATH - SQLite database path, used when --backend sqlite (default: data/credit_scores.db)
//! - CREDIT_HISTOGRAM_WIDTH - Widest histogram bar in characters (default: 50)
//! - RUST_LOG - Logging level (optional, default: info)

use lendscore::config::ScoringConfig;
use lendscore::ingest::TransactionLoader;
use lendscore::persistence::ScoreWriter;
use lendscore::report::{ScoreDistribution, ScoreSummary};
use lendscore::scoring_core::ScoringRun;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    if let Err(e) = run().await {
        log::error!("❌ Credit scoring failed: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = ScoringConfig::from_env()?.apply_args(&args)?;

    log::info!("🚀 Starting credit scoring");
    log::info!("   Input: {}", config.input_path.display());
    log::info!("   Backend: {}", config.backend.as_str());
    log::info!("   Output: {}", config.output_target().display());

    log::info!("Step 1: Loading and preprocessing data...");
    let loaded = TransactionLoader::new(&config.input_path).load().await?;

    log::info!("Step 2: Extracting features...");
    let mut run = ScoringRun::new(&loaded.records);
    let wallet_count = run.aggregate()?.len();
    log::info!("   Extracted features for {} wallets", wallet_count);

    log::info!("Step 3: Calculating credit scores...");
    let output = run.finish()?;

    log::info!("Step 4: Analyzing score distribution...");
    let distribution = ScoreDistribution::from_scores(&output.scores);
    println!("{}", distribution.render_histogram(config.histogram_width));

    if let Some(summary) = ScoreSummary::from_scores(&output.scores) {
        log::info!(
            "📊 Scores: n={} min={:.1} max={:.1} mean={:.1} median={:.1}",
            summary.count,
            summary.min,
            summary.max,
            summary.mean,
            summary.median
        );
    }

    log::info!("Step 5: Saving results...");
    let mut writer = ScoreWriter::new(config.backend, config.output_target())?;
    writer.write_all(&output.scores, &distribution).await?;

    log::info!(
        "✅ Credit scoring completed: {} wallets written via {}",
        output.scores.len(),
        writer.backend_type()
    );
    Ok(())
}
