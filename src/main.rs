use crashcast::application::advisor::StakeAdvisor;
use crashcast::application::engine::{CycleReport, PredictionEngine};
use crashcast::application::predictor::CrashPredictor;
use crashcast::config::{Config, FeedMode};
use crashcast::domain::features::FeatureBuilder;
use crashcast::domain::history::RoundHistory;
use crashcast::domain::ports::{HistoryRepository, ObservationFeed};
use crashcast::infrastructure::mock::NullHistoryRepository;
use crashcast::infrastructure::{CsvHistoryRepository, ReplayFeed, SimulatedFeed};

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc;
use tracing::{Level, info, warn};
use tracing_subscriber::prelude::*;

/// Logs each cycle for the presentation side: the metric cards plus the
/// current recommendation, read-only.
fn render_report(report: &CycleReport) {
    if let Some(obs) = &report.observation {
        info!("Round crashed at {:.2}x", obs.value);
    }

    if let Some(m) = &report.metrics {
        info!(
            "Session: {} rounds | avg crash {:.2}x | win rate {:.1}% | profit ${} | ROI {:.1}%",
            m.rounds, m.average_crash, m.win_rate, m.total_profit, m.roi
        );
    }

    match &report.recommendation {
        Some(rec) => {
            let source = if rec.heuristic { "heuristic" } else { "model" };
            info!(
                "Recommendation ({}): next ~{:.2}x | exit {:.2}x | stake ${} ({:.1}% of bankroll) | \
                 confidence {:.0} ({:?}) | trend {} | win prob {:.0}% | EV ${}",
                source,
                rec.predicted_value,
                rec.recommended_exit,
                rec.recommended_stake,
                rec.stake_fraction * 100.0,
                rec.confidence,
                rec.label,
                rec.trend,
                rec.win_probability * 100.0,
                rec.expected_value
            );
        }
        None => info!(
            "No recommendation yet ({} rounds observed)",
            report.rounds_observed
        ),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .init();

    info!("Initializing Crashcast...");

    let config = Config::from_env()?;

    let feed: Arc<dyn ObservationFeed> = match config.feed_mode {
        FeedMode::Simulated => {
            info!(
                "Feed: simulated rounds, multipliers in [{}, {})",
                config.sim_low, config.sim_high
            );
            Arc::new(SimulatedFeed::new(config.sim_low, config.sim_high))
        }
        FeedMode::Replay => {
            Arc::new(ReplayFeed::from_path(PathBuf::from(&config.replay_path)).await?)
        }
    };

    let repository: Arc<dyn HistoryRepository> = if config.persistence_enabled {
        Arc::new(CsvHistoryRepository::new(PathBuf::from(
            &config.history_path,
        )))
    } else {
        Arc::new(NullHistoryRepository)
    };

    let mut predictor = CrashPredictor::new(
        config.to_predictor_config(),
        FeatureBuilder::new(config.feature_window),
    );
    if let Some(model_path) = &config.model_path {
        if let Err(e) = predictor.load_model(&PathBuf::from(model_path)) {
            warn!("Could not load model from {}, starting untrained: {}", model_path, e);
        }
    }
    let advisor = StakeAdvisor::new(config.to_advisor_config());
    let history = RoundHistory::new(config.history_capacity);

    let engine = PredictionEngine::new(
        config.to_engine_config(),
        history,
        predictor,
        advisor,
        feed,
        repository,
    );

    let shutdown = Arc::new(AtomicBool::new(false));
    let (report_tx, mut report_rx) = mpsc::channel::<CycleReport>(32);

    let engine_handle = tokio::spawn(engine.run(shutdown.clone(), report_tx));

    let presentation = tokio::spawn(async move {
        while let Some(report) = report_rx.recv().await {
            render_report(&report);
        }
    });

    tokio::signal::ctrl_c().await?;
    info!("Ctrl-C received, shutting down...");
    shutdown.store(true, Ordering::Relaxed);

    if let Err(e) = engine_handle.await {
        warn!("Engine task ended abnormally: {}", e);
    }
    let _ = presentation.await;

    info!("Goodbye.");
    Ok(())
}
