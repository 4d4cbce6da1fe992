use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use ferrite_mlp::{logging, train_loop, Dataset, Network, RunConfig, TrainConfig};

#[derive(Parser)]
#[command(version, about = "Train and query a from-scratch sigmoid network")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Train a network and write its snapshot
    Train {
        /// JSON run configuration (topology, learning_rate, momentum, ...)
        #[arg(short, long, value_name = "PATH")]
        config: Option<PathBuf>,
        /// JSON dataset `{ "inputs": [..], "targets": [..] }`; XOR when omitted
        #[arg(short, long, value_name = "PATH")]
        data: Option<PathBuf>,
        /// Where to write the trained snapshot
        #[arg(short, long, value_name = "PATH", default_value = "network.json")]
        out: PathBuf,
        #[arg(short, long, value_name = "INT")]
        epochs: Option<usize>,
        #[arg(long, value_name = "INT")]
        seed: Option<u64>,
    },
    /// Run a saved network on one comma-separated input vector
    Predict {
        #[arg(short, long, value_name = "PATH")]
        model: PathBuf,
        #[arg(short, long, value_delimiter = ',', allow_hyphen_values = true, num_args = 1..)]
        input: Vec<f64>,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Cli::parse();
    logging::init_logging(args.verbose)?;

    match args.command {
        Command::Train { config, data, out, epochs, seed } => {
            let file_config = match config {
                Some(path) => RunConfig::load_json(path)?,
                None => RunConfig::default(),
            };
            let cli_config = RunConfig { epochs, seed, ..RunConfig::default() };
            let run = file_config.merge(cli_config).resolve()?;

            let dataset = match data {
                Some(path) => Dataset::load_json(path)?,
                None => Dataset::xor(),
            };

            let mut rng = match run.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let mut network =
                Network::with_rng(&run.topology, run.learning_rate, run.momentum, &mut rng)?;
            info!(topology = ?run.topology, samples = dataset.len(), "training");

            let mut train_config = TrainConfig::new(run.epochs).shuffled(run.seed);
            train_config.log_every = run.log_every;
            if let Some(stats) = train_loop(&mut network, &dataset.inputs, &dataset.targets, &train_config)? {
                println!(
                    "epoch {}: mean loss {:.6}, total squared error {:.6}",
                    stats.epoch, stats.train_loss, stats.sum_squared_error
                );
            }

            network.save_json(&out)?;
            println!("saved to {}", out.display());
        }
        Command::Predict { model, input } => {
            let mut network = Network::load_json(&model)?;
            let class = network.classify(&input)?;
            if let Some(output) = network.results().last() {
                println!("output: {:?}", output);
            }
            match class.label {
                Some(label) => println!("class: {} ({})", class.index, label),
                None => println!("class: {}", class.index),
            }
        }
    }
    Ok(())
}
