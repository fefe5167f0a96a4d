use clap::Parser;
use crashcast::application::predictor::{CrashPredictor, PredictorConfig};
use crashcast::domain::features::FeatureBuilder;
use crashcast::domain::ports::HistoryRepository;
use crashcast::infrastructure::CsvHistoryRepository;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Walk-forward evaluation of the crash predictor over a recorded history", long_about = None)]
struct Args {
    /// Path to a recorded history CSV (same layout the live session writes)
    #[arg(long, default_value = "data/history.csv")]
    input: PathBuf,

    /// Rolling feature window
    #[arg(long, default_value_t = 10)]
    window: usize,

    /// Minimum rounds before the first train
    #[arg(long, default_value_t = 10)]
    min_rounds: usize,

    /// Retrain every N rounds during the walk-forward
    #[arg(long, default_value_t = 10)]
    retrain_every: usize,

    /// Number of trees in the random forest
    #[arg(long, default_value_t = 100)]
    n_trees: usize,

    /// Maximum depth of trees
    #[arg(long, default_value_t = 5)]
    max_depth: u16,

    /// Minimum samples required to split an internal node
    #[arg(long, default_value_t = 2)]
    min_split: usize,

    /// Prediction clamp range
    #[arg(long, default_value_t = 1.1)]
    clamp_min: f64,
    #[arg(long, default_value_t = 10.0)]
    clamp_max: f64,

    /// Maximum number of rounds to use (most recent). 0 = use all.
    #[arg(long, default_value_t = 0)]
    max_rows: usize,

    /// Save the final trained model as JSON
    #[arg(long)]
    model_out: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if !args.input.exists() {
        println!(
            "History not found at {:?}. Run the live session first to record rounds.",
            args.input
        );
        return Ok(());
    }

    println!("Loading history from {:?}", args.input);
    let repo = CsvHistoryRepository::new(args.input.clone());
    let mut observations = repo.load().await?;

    if args.max_rows > 0 && observations.len() > args.max_rows {
        let skip = observations.len() - args.max_rows;
        observations.drain(..skip);
        println!(
            "Using most recent {} rounds (skipped {} older rounds)",
            args.max_rows, skip
        );
    }

    if observations.len() <= args.min_rounds {
        println!(
            "Not enough rounds to evaluate: {} loaded, need more than {}.",
            observations.len(),
            args.min_rounds
        );
        return Ok(());
    }

    let config = PredictorConfig {
        min_training_rounds: args.min_rounds,
        n_trees: args.n_trees,
        max_depth: args.max_depth,
        min_samples_split: args.min_split,
        clamp_min: args.clamp_min,
        clamp_max: args.clamp_max,
    };
    let mut predictor = CrashPredictor::new(config, FeatureBuilder::new(args.window));

    println!(
        "Walk-forward over {} rounds (window={}, retrain every {}, trees={}, depth={})...",
        observations.len(),
        args.window,
        args.retrain_every,
        args.n_trees,
        args.max_depth
    );

    let mut predictions: Vec<f64> = Vec::new();
    let mut actuals: Vec<f64> = Vec::new();
    let mut rounds_since_train = args.retrain_every; // force an initial train

    for i in args.min_rounds..observations.len() {
        if rounds_since_train >= args.retrain_every {
            predictor.train(&observations[..i])?;
            rounds_since_train = 0;
        }
        rounds_since_train += 1;

        if let Some(pred) = predictor.predict(&observations[..i]) {
            predictions.push(pred.value);
            actuals.push(observations[i].value);
        }
    }

    let n = predictions.len();
    if n == 0 {
        println!("No predictions produced.");
        return Ok(());
    }

    let sq_err: f64 = predictions
        .iter()
        .zip(actuals.iter())
        .map(|(p, t)| (p - t).powi(2))
        .sum();
    let rmse = (sq_err / n as f64).sqrt();
    let mae: f64 = predictions
        .iter()
        .zip(actuals.iter())
        .map(|(p, t)| (p - t).abs())
        .sum::<f64>()
        / n as f64;

    let pred_mean = predictions.iter().sum::<f64>() / n as f64;
    let pred_min = predictions.iter().cloned().fold(f64::INFINITY, f64::min);
    let pred_max = predictions
        .iter()
        .cloned()
        .fold(f64::NEG_INFINITY, f64::max);

    // How often did the round actually reach the predicted multiplier?
    let reached = predictions
        .iter()
        .zip(actuals.iter())
        .filter(|(p, t)| t >= p)
        .count();

    println!("\n══════════════════════════════════════════════");
    println!("  WALK-FORWARD EVALUATION (n={})", n);
    println!("══════════════════════════════════════════════");
    println!("  RMSE:       {:.4}", rmse);
    println!("  MAE:        {:.4}", mae);
    println!(
        "  Predictions: mean {:.2}x, range [{:.2}x .. {:.2}x]",
        pred_mean, pred_min, pred_max
    );
    println!(
        "  Clamp range respected: {}",
        predictions
            .iter()
            .all(|p| *p >= args.clamp_min && *p <= args.clamp_max)
    );
    println!(
        "  Rounds reaching prediction: {:.1}%  ({}/{})",
        reached as f64 / n as f64 * 100.0,
        reached,
        n
    );
    println!("══════════════════════════════════════════════\n");

    if let Some(model_path) = args.model_out {
        predictor.train(&observations)?;
        predictor.save_model(&model_path)?;
        println!("Final model saved to {:?}", model_path);
    }

    Ok(())
}
