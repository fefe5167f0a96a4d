use crate::application::advisor::StakeAdvisor;
use crate::application::predictor::CrashPredictor;
use crate::domain::history::RoundHistory;
use crate::domain::metrics::SessionMetrics;
use crate::domain::observation::Observation;
use crate::domain::ports::{HistoryRepository, ObservationFeed};
use crate::domain::recommendation::Recommendation;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc::Sender;
use tokio::time::{self, Duration};
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub poll_interval_ms: u64,
    /// New observations accumulated before a wholesale retrain
    pub retrain_interval: usize,
    /// Trailing values handed to the advisor for trend / win-probability
    pub recent_window: usize,
    pub bankroll: Decimal,
    /// Target exit used for the session metric cards
    pub metrics_target_exit: f64,
    /// Flat stake assumed by the session metric cards
    pub metrics_stake: Decimal,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 2000,
            retrain_interval: 5,
            recent_window: 10,
            bankroll: dec!(1000),
            metrics_target_exit: 2.0,
            metrics_stake: dec!(10),
        }
    }
}

/// Everything the presentation side needs from one loop iteration.
#[derive(Debug, Clone)]
pub struct CycleReport {
    /// The observation recorded this cycle, if the feed produced one
    pub observation: Option<Observation>,
    /// Absent while history is empty; heuristic until the predictor trains
    pub recommendation: Option<Recommendation>,
    pub metrics: Option<SessionMetrics>,
    pub rounds_observed: usize,
    pub trained: bool,
}

/// The application context for one prediction session: history, predictor and
/// advisor plus the feed and repository collaborators, driven by a single
/// cooperative polling loop. Any collaborator failure degrades to a report
/// without recommendation; nothing crashes the loop.
pub struct PredictionEngine {
    config: EngineConfig,
    history: RoundHistory,
    predictor: CrashPredictor,
    advisor: StakeAdvisor,
    feed: Arc<dyn ObservationFeed>,
    repository: Arc<dyn HistoryRepository>,
    new_since_train: usize,
}

impl PredictionEngine {
    pub fn new(
        config: EngineConfig,
        history: RoundHistory,
        predictor: CrashPredictor,
        advisor: StakeAdvisor,
        feed: Arc<dyn ObservationFeed>,
        repository: Arc<dyn HistoryRepository>,
    ) -> Self {
        Self {
            config,
            history,
            predictor,
            advisor,
            feed,
            repository,
            new_since_train: 0,
        }
    }

    pub fn rounds_observed(&self) -> usize {
        self.history.len()
    }

    /// Seed history from the repository. Best-effort: a missing or corrupt
    /// recording just means an empty start.
    pub async fn restore(&mut self) {
        match self.repository.load().await {
            Ok(observations) if !observations.is_empty() => {
                self.history.restore(observations);
                info!("Restored {} rounds from repository", self.history.len());
            }
            Ok(_) => debug!("No persisted history, starting empty"),
            Err(e) => warn!("Failed to load history, starting empty: {}", e),
        }
    }

    /// One loop iteration: poll, record, persist, maybe retrain, recommend.
    pub async fn cycle(&mut self) -> CycleReport {
        let observation = self.poll_feed().await;

        self.maybe_retrain();

        let snapshot = self.history.snapshot();
        let recent = self.history.recent(self.config.recent_window);

        let recommendation = self
            .predictor
            .predict(&snapshot)
            .map(|p| self.advisor.advise(p, &recent, self.config.bankroll))
            .or_else(|| self.advisor.heuristic(&recent, self.config.bankroll));

        let metrics = SessionMetrics::compute(
            &self.history.values(),
            self.config.metrics_target_exit,
            self.config.metrics_stake,
        );

        CycleReport {
            observation,
            recommendation,
            metrics,
            rounds_observed: self.history.len(),
            trained: self.predictor.is_trained(),
        }
    }

    async fn poll_feed(&mut self) -> Option<Observation> {
        let obs = match self.feed.next_observation().await {
            Ok(Some(obs)) => obs,
            Ok(None) => {
                debug!("No new round this cycle");
                return None;
            }
            Err(e) => {
                error!("Feed failure, continuing with stale history: {}", e);
                return None;
            }
        };

        if let Err(e) = self.history.record_at(obs.timestamp, obs.value) {
            warn!("Rejected observation: {}", e);
            return None;
        }
        self.new_since_train += 1;

        if let Err(e) = self.repository.save(&self.history.snapshot()).await {
            warn!("Failed to persist history: {}", e);
        }

        Some(obs)
    }

    fn maybe_retrain(&mut self) {
        let due = self.new_since_train >= self.config.retrain_interval
            || (!self.predictor.is_trained() && self.new_since_train > 0);
        if !due {
            return;
        }

        match self.predictor.train(&self.history.snapshot()) {
            Ok(()) => self.new_since_train = 0,
            Err(e @ crate::domain::errors::PredictorError::NotReady { .. }) => {
                debug!("{}", e);
            }
            Err(e) => warn!("Training failed, keeping previous model: {}", e),
        }
    }

    /// Drive the loop until the shutdown flag is set or the report receiver
    /// goes away. The first tick fires immediately.
    pub async fn run(mut self, shutdown: Arc<AtomicBool>, reports: Sender<CycleReport>) {
        self.restore().await;

        info!(
            "Prediction engine started (poll every {}ms, retrain every {} rounds)",
            self.config.poll_interval_ms, self.config.retrain_interval
        );

        let mut interval = time::interval(Duration::from_millis(self.config.poll_interval_ms));
        loop {
            interval.tick().await;
            if shutdown.load(Ordering::Relaxed) {
                info!("Shutdown flag set, stopping prediction engine");
                break;
            }

            let report = self.cycle().await;
            if reports.send(report).await.is_err() {
                warn!("Report receiver dropped, stopping prediction engine");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::advisor::AdvisorConfig;
    use crate::application::predictor::PredictorConfig;
    use crate::domain::features::FeatureBuilder;
    use crate::infrastructure::mock::{NullHistoryRepository, ScriptedFeed};

    fn engine_with(values: Vec<f64>) -> PredictionEngine {
        PredictionEngine::new(
            EngineConfig {
                retrain_interval: 3,
                ..EngineConfig::default()
            },
            RoundHistory::new(100),
            CrashPredictor::new(PredictorConfig::default(), FeatureBuilder::new(10)),
            StakeAdvisor::new(AdvisorConfig::default()),
            Arc::new(ScriptedFeed::new(values)),
            Arc::new(NullHistoryRepository),
        )
    }

    #[tokio::test]
    async fn test_first_cycle_falls_back_to_heuristic() {
        let mut engine = engine_with(vec![2.0]);
        let report = engine.cycle().await;

        assert_eq!(report.rounds_observed, 1);
        assert!(!report.trained);
        let rec = report.recommendation.expect("heuristic should kick in");
        assert!(rec.heuristic);
    }

    #[tokio::test]
    async fn test_invalid_observation_rejected_at_boundary() {
        let mut engine = engine_with(vec![0.5, 2.0]);

        let first = engine.cycle().await;
        assert!(first.observation.is_none());
        assert_eq!(first.rounds_observed, 0);
        assert!(first.recommendation.is_none());

        let second = engine.cycle().await;
        assert!(second.observation.is_some());
        assert_eq!(second.rounds_observed, 1);
    }

    #[tokio::test]
    async fn test_engine_trains_once_enough_rounds_observed() {
        let values = vec![1.2, 1.5, 1.8, 2.0, 2.3, 1.1, 1.4, 1.6, 1.9, 2.5, 2.1, 1.7];
        let mut engine = engine_with(values.clone());

        let mut last = None;
        for _ in 0..values.len() {
            last = Some(engine.cycle().await);
        }
        let report = last.unwrap();

        assert!(report.trained);
        let rec = report.recommendation.expect("trained engine must recommend");
        assert!(!rec.heuristic);
        assert!(rec.predicted_value >= 1.1 && rec.predicted_value <= 10.0);
        assert!(rec.stake_fraction >= 0.01 && rec.stake_fraction <= 0.03);
        assert!(rec.recommended_exit < rec.predicted_value);

        let metrics = report.metrics.expect("non-empty history has metrics");
        assert_eq!(metrics.rounds, values.len());
    }

    #[tokio::test]
    async fn test_exhausted_feed_keeps_loop_alive() {
        let mut engine = engine_with(vec![2.0]);
        engine.cycle().await;

        // Feed is now exhausted: None is no-data, not an error
        let report = engine.cycle().await;
        assert!(report.observation.is_none());
        assert_eq!(report.rounds_observed, 1);
        assert!(report.recommendation.is_some());
    }
}
