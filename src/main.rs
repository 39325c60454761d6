use clap::Parser;
use dotenvy::dotenv;
use file_intake::infrastructure::picker;
use file_intake::services::notifier::TracingSink;
use file_intake::utils::validation::accept_attribute;
use file_intake::{BlobUrlBackend, DragEvent, FileIntake, IntakeConfig};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Drop files into an intake and print the resulting selection
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Files to drop, in order
    paths: Vec<PathBuf>,

    /// JSON configuration file (defaults to INTAKE_* environment variables)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Maximum number of selected files
    #[arg(long)]
    max_files: Option<usize>,

    /// Per-file size ceiling in bytes
    #[arg(long)]
    max_size: Option<u64>,

    /// Accepted type patterns, e.g. "image/*,.pdf"
    #[arg(long, value_delimiter = ',')]
    accept: Option<Vec<String>>,

    /// Only take the first file of each gesture
    #[arg(long)]
    single: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "file_intake=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => IntakeConfig::from_json(&tokio::fs::read_to_string(path).await?)?,
        None => IntakeConfig::from_env(),
    };
    if let Some(max_files) = args.max_files {
        config = config.with_max_files(max_files);
    }
    if let Some(max_size) = args.max_size {
        config = config.with_max_size(max_size);
    }
    if let Some(patterns) = &args.accept {
        config = config.with_accepted_types(patterns);
    }
    if args.single {
        config = config.with_multiple(false);
    }

    info!(
        "📂 Intake Config: Max Files={}, Max Size={}MB, Accept='{}', Multiple={}",
        config.max_files,
        config.max_size / 1024 / 1024,
        accept_attribute(&config),
        config.multiple
    );

    let files = picker::load_files(&args.paths).await?;

    let backend = Arc::new(BlobUrlBackend::new());
    let mut intake = FileIntake::new(config, backend.clone(), Arc::new(TracingSink))
        .on_files_change(|files| info!("🔄 Selection now holds {} files", files.len()));

    intake.handle_drag_event(DragEvent::Enter);
    intake.handle_drag_event(DragEvent::Over);
    let response = intake.handle_drag_event(DragEvent::Drop(files));

    let report = json!({
        "outcome": response.outcome,
        "selection": &*intake.snapshot(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    drop(intake);
    info!(
        "🧹 Previews created={}, revoked={}, live={}",
        backend.created(),
        backend.revoked(),
        backend.live()
    );

    Ok(())
}
