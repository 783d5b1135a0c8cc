use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use nntc::config::ConfigManager;
use nntc::data::CsvConnector;
use nntc::ml::labeling::{LabelRule, LabelStrategy, Labeler};
use nntc::ml::models::{build_wavenet, ModelShape};
use nntc::strategy::StrategyRegistry;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "nntc")]
#[command(about = "Trinary classifier strategy tooling", long_about = None)]
struct Cli {
    /// TOML config file; NNTC_* environment variables override it
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add train_buy / train_sell columns to an enriched bar table
    Label {
        /// CSV bar table carrying the rule's indicator columns
        #[arg(short, long)]
        data: PathBuf,

        /// Strategy variant name; without it the [labeling] config is used
        #[arg(short, long)]
        variant: Option<String>,

        /// Where to write the labeled table (optional)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also copy intermediate columns out under the % prefix
        #[arg(long)]
        debug: bool,
    },

    /// Print the Wavenet layer summary
    Model {
        /// Rows per input window (default: [model] seq_len)
        #[arg(short, long)]
        seq_len: Option<usize>,

        /// Feature columns per row
        #[arg(short, long)]
        features: usize,

        /// Print the graph as JSON instead
        #[arg(long)]
        json: bool,
    },

    /// Print the known strategy variants as JSON
    Variants,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let manager = ConfigManager::new();
    manager
        .load_layered(cli.config.as_deref())
        .context("loading configuration")?;
    let config = manager.get();

    match cli.command {
        Commands::Label {
            data,
            variant,
            output,
            debug,
        } => {
            let labeler = match variant {
                Some(name) => {
                    let registry = StrategyRegistry::new();
                    let variant = registry.resolve(&name)?;
                    log::info!(
                        "Using variant {} ({} classifier)",
                        variant.name,
                        variant.classifier.as_str()
                    );
                    let rule = LabelStrategy::from_kind(
                        variant.label_strategy,
                        config.labeling.oscillator_extreme,
                    );
                    Labeler::new(rule, variant.label_params(&config.labeling.timeframe)?)
                }
                None => config.labeling.labeler()?,
            };
            let labeler = labeler.with_debug_indicators(debug || config.labeling.debug_indicators);

            let df = CsvConnector::load_bar_table(&data, labeler.rule().required_columns(), None)
                .with_context(|| format!("loading {}", data.display()))?;
            let mut labeled = labeler.label(&df)?;

            println!("{}", serde_json::to_string_pretty(&labeled.stats)?);
            if let Some(path) = output {
                CsvConnector::write(&mut labeled.frame, &path)
                    .with_context(|| format!("writing {}", path.display()))?;
            }
        }
        Commands::Model {
            seq_len,
            features,
            json,
        } => {
            let shape = match seq_len {
                Some(seq_len) => ModelShape::new(seq_len, features),
                None => config.model.shape(features),
            };
            let graph = build_wavenet(shape)?;
            if json {
                println!("{}", graph.to_json()?);
            } else {
                println!("{}", graph.summary()?);
            }
        }
        Commands::Variants => {
            let registry = StrategyRegistry::new();
            let variants: Vec<_> = registry.variants().collect();
            println!("{}", serde_json::to_string_pretty(&variants)?);
        }
    }

    Ok(())
}
