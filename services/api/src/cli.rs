use crate::predict::{run_batch, run_form, run_predict, BatchArgs, FormArgs, PredictArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use loan_advisor::config::ModelConfig;
use loan_advisor::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Smart Loan Approval Advisor",
    about = "Serve and run the loan approval advisor from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Assess a single application and print the verdict
    Predict(PredictArgs),
    /// Score every row of a CSV export
    Batch(BatchArgs),
    /// Print the application form fields and help text
    Form(FormArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    #[command(flatten)]
    pub(crate) models: ModelArgs,
}

/// Overrides for the model artifact locations.
#[derive(Args, Debug, Default)]
pub(crate) struct ModelArgs {
    /// Path to the fitted scaler artifact (JSON)
    #[arg(long)]
    pub(crate) scaler: Option<PathBuf>,
    /// Path to the trained classifier artifact (JSON)
    #[arg(long)]
    pub(crate) classifier: Option<PathBuf>,
    /// Maximum memoized predictions; 0 disables the cache
    #[arg(long)]
    pub(crate) cache_capacity: Option<u64>,
}

impl ModelArgs {
    pub(crate) fn apply(self, config: &mut ModelConfig) {
        if let Some(path) = self.scaler {
            config.scaler_path = path;
        }
        if let Some(path) = self.classifier {
            config.classifier_path = path;
        }
        if let Some(capacity) = self.cache_capacity {
            config.cache_capacity = capacity;
        }
    }
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Predict(args) => run_predict(args),
        Command::Batch(args) => run_batch(args),
        Command::Form(args) => run_form(args),
    }
}
