use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;

use loan_ai::config::AppConfig;
use loan_ai::error::AppError;
use loan_ai::prediction::{
    FredClient, LoanApplication, ModelStore, PredictionService, StaticIndicatorProvider,
};

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Path to a JSON file containing one loan application payload
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Fetch live macro indicators instead of the fixed fallback set
    #[arg(long)]
    pub(crate) live: bool,
}

/// One-shot scoring from disk, sharing the exact pipeline the HTTP endpoint
/// runs. Without `--live` the macro path uses the fallback indicator set,
/// so the command works fully offline.
pub(crate) async fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let store = ModelStore::load(&config.models)?;

    let raw = std::fs::read_to_string(&args.input)?;
    let application: LoanApplication = serde_json::from_str(&raw)?;

    let prediction = if args.live {
        let provider = Arc::new(FredClient::new(&config.macro_data)?);
        PredictionService::new(store, provider)
            .predict(&application)
            .await?
    } else {
        let provider = Arc::new(StaticIndicatorProvider::default());
        PredictionService::new(store, provider)
            .predict(&application)
            .await?
    };

    println!("{}", serde_json::to_string_pretty(&prediction)?);
    Ok(())
}
