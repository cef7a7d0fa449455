use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

use sparse_connect_four::ai::QLearningAgent;
use sparse_connect_four::config::AppConfig;
use sparse_connect_four::training::{derive_seed, TextRenderer, Trainer};

/// Train a tabular Q-learning Connect Four agent against a random opponent.
#[derive(Parser)]
#[command(name = "train", about = "Train a sparse Q-learning Connect Four agent")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Override number of training episodes
    #[arg(long)]
    episodes: Option<usize>,

    /// Override the model output path
    #[arg(long)]
    output: Option<PathBuf>,

    /// Override learning rate
    #[arg(long)]
    lr: Option<f64>,

    /// Seed every random stream for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Print the board during rendered episodes
    #[arg(long)]
    render: bool,

    /// Resume from the model file and its checkpoint sidecar
    #[arg(long)]
    resume: bool,

    /// Print the default configuration as TOML and exit
    #[arg(long)]
    print_default_config: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.print_default_config {
        print!("{}", AppConfig::default_toml());
        return Ok(());
    }

    // Load configuration
    let mut app_config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    // Apply CLI overrides
    if let Some(episodes) = cli.episodes {
        app_config.training.episodes = episodes;
    }
    if let Some(output) = cli.output {
        app_config.training.model_path = output;
    }
    if let Some(lr) = cli.lr {
        app_config.agent.learning_rate = lr;
    }
    if cli.seed.is_some() {
        app_config.training.seed = cli.seed;
    }
    if cli.render {
        app_config.training.render = true;
    }
    app_config
        .validate()
        .context("invalid configuration after CLI overrides")?;

    let training = app_config.training.clone();
    let mut agent = match training.seed {
        Some(seed) => {
            QLearningAgent::with_seed(app_config.agent.clone(), training.cols, derive_seed(seed, 0))
        }
        None => QLearningAgent::new(app_config.agent.clone(), training.cols),
    }
    .context("building agent")?;

    let mut trainer = Trainer::new(training.clone()).context("building trainer")?;
    if training.render {
        trainer = trainer.with_renderer(Box::new(TextRenderer::stdout()));
    }

    if cli.resume {
        let manager = trainer.checkpoint_manager();
        match manager
            .restore(&mut agent)
            .with_context(|| format!("resuming from {}", manager.model_path().display()))?
        {
            Some(meta) => println!(
                "Resumed from episode {} (epsilon {:.3}, {} states)",
                meta.episode,
                meta.epsilon,
                agent.q_table().len()
            ),
            None => println!(
                "Loaded {} states from {} (no checkpoint metadata)",
                agent.q_table().len(),
                manager.model_path().display()
            ),
        }
    }

    let progress_bar = ProgressBar::new(training.episodes as u64).with_style(
        ProgressStyle::default_bar()
            .template("Training |{wide_bar}| {pos}/{len} [{elapsed_precise}>{eta_precise}]")?,
    );
    let summary = trainer
        .train_with_progress(&mut agent, || progress_bar.inc(1))
        .context("training failed")?;
    progress_bar.finish_and_clear();

    println!(
        "Episodes: {} | wins: {} | losses: {} | draws: {}",
        summary.episodes, summary.wins, summary.losses, summary.draws
    );
    println!(
        "Final epsilon: {:.4} | states learned: {}",
        summary.final_epsilon, summary.table_entries
    );
    println!("Model saved to {}", training.model_path.display());

    Ok(())
}
