//! Income Prediction Pipeline - Main Entry Point
//!
//! `train` runs the one-shot training pipeline; `serve` consumes scoring
//! requests from NATS, applies the latest artifact bundle, and publishes
//! predictions. Messages are scored strictly one at a time.

use anyhow::Result;
use clap::{Parser, Subcommand};
use futures::StreamExt;
use income_prediction_pipeline::{
    artifacts::ArtifactStore,
    config::AppConfig,
    consumer::RequestConsumer,
    metrics::{MetricsReporter, ScoringMetrics},
    producer::PredictionProducer,
    scoring::ScoringService,
    train::TrainingPipeline,
    types::ScoringRequest,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(
    name = "income-prediction-pipeline",
    about = "Tabular income classification: training and streaming scoring"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(long, default_value = "config/config.toml")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Train the model and persist the artifact bundle
    Train,
    /// Serve predictions from the message stream
    Serve,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_from_path(&cli.config)?;

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(
                format!("income_prediction_pipeline={}", config.logging.level).parse()?,
            ),
        )
        .init();

    info!("Configuration loaded successfully");

    match cli.command {
        Command::Train => run_training(config),
        Command::Serve => run_serving(config).await,
    }
}

fn run_training(config: AppConfig) -> Result<()> {
    info!("Starting training pipeline");
    let report = TrainingPipeline::new(config).run()?;
    info!(
        accuracy = format!("{:.4}", report.accuracy),
        macro_f1 = format!("{:.4}", report.macro_f1),
        "Training pipeline finished"
    );
    Ok(())
}

async fn run_serving(config: AppConfig) -> Result<()> {
    info!("Starting scoring service");

    // Load the frozen bundle once; it is immutable for the loop's lifetime
    let store = ArtifactStore::new(&config.artifacts.dir);
    let service = ScoringService::load(&store)?;

    let metrics = Arc::new(ScoringMetrics::new());

    // Connect to NATS
    let client = async_nats::connect(&config.nats.url).await?;
    info!("Connected to NATS at {}", config.nats.url);

    let consumer = RequestConsumer::new(client.clone(), &config.nats.request_subject);
    let producer = PredictionProducer::new(client.clone(), &config.nats.prediction_subject);

    info!("Listening on subject: {}", config.nats.request_subject);
    info!("Publishing predictions to: {}", config.nats.prediction_subject);

    // Periodic metrics summary
    let metrics_clone = metrics.clone();
    tokio::spawn(async move {
        let reporter = MetricsReporter::new(metrics_clone, 30);
        reporter.start().await;
    });

    // Strictly sequential: one message is fully scored before the next is
    // read. The loop ends only when the subscription closes.
    let mut subscription = consumer.subscribe().await?;

    while let Some(message) = subscription.next().await {
        let start_time = Instant::now();

        let request = match serde_json::from_slice::<ScoringRequest>(&message.payload) {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "Failed to deserialize scoring request");
                metrics.record_malformed();
                continue;
            }
        };

        match service.score(&request) {
            Ok(prediction) => {
                metrics.record_scored(start_time.elapsed());
                if let Err(e) = producer.publish(&prediction).await {
                    error!(
                        request_id = %request.request_id,
                        error = %e,
                        "Failed to publish prediction"
                    );
                } else {
                    info!(
                        request_id = %request.request_id,
                        label = %prediction.label,
                        scoring_time_us = start_time.elapsed().as_micros(),
                        "Prediction published"
                    );
                }
            }
            Err(e) if e.is_message_scoped() => {
                // Bad input in one message never stops the stream
                metrics.record_skipped();
                warn!(
                    request_id = %request.request_id,
                    error = %e,
                    "Skipping message"
                );
            }
            Err(e) => {
                error!(
                    request_id = %request.request_id,
                    error = %e,
                    "Scoring failed"
                );
                return Err(e.into());
            }
        }
    }

    info!("Subscription closed, shutting down");
    metrics.print_summary();

    Ok(())
}
