//! Command line front end: builds every model/discretization combination on a
//! training file and writes the evaluation overview.

use anyhow::{bail, Context};
use clap::Parser;
use id3_bayes::data::reader::DataReader;
use id3_bayes::data::structure::Structure;
use id3_bayes::discretize::Strategy;
use id3_bayes::experiment::{write_overview_file, Experiment, ExperimentConfig, ModelKind};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "id3-bayes")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Train and evaluate Naive Bayes and ID3 classifiers on discretized data", long_about = None)]
struct Args {
    /// Training file (*.csv)
    #[arg(long)]
    train: PathBuf,

    /// Test file (*.csv)
    #[arg(long)]
    test: Option<PathBuf>,

    /// Structure file declaring columns and their values
    #[arg(long = "structure", visible_alias = "struct")]
    structure: Option<PathBuf>,

    /// Output folder, defaults to the training file's folder
    #[arg(long)]
    out: Option<PathBuf>,

    /// Number of bins to discretize with
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u32).range(1..))]
    bins: u32,

    /// Minimum normalized gain for splitting a tree node
    #[arg(long, default_value_t = 0.3)]
    gain: f64,

    /// Minimum number of samples for splitting a tree node
    #[arg(long, default_value_t = 0)]
    leafs: usize,

    /// Name of the class column
    #[arg(long, default_value = "class")]
    label: String,

    /// Discretization strategies to run (equal-width, equal-depth, entropy), all by default
    #[arg(long = "strategy")]
    strategies: Vec<Strategy>,

    /// Only build this model
    #[arg(long, value_parser = parse_model)]
    model: Option<ModelKind>,

    /// Without a test file, train on this share of the training file and test on the rest
    #[arg(long)]
    split: Option<f64>,

    /// Seed for the train/test split
    #[arg(long)]
    seed: Option<u64>,

    /// More output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Args {
    fn log_filter(&self) -> &'static str {
        if self.quiet {
            return "id3_bayes=warn";
        }
        match self.verbose {
            0 => "id3_bayes=info",
            1 => "id3_bayes=debug",
            _ => "id3_bayes=trace",
        }
    }

    fn config(&self) -> anyhow::Result<ExperimentConfig> {
        if !self.gain.is_finite() || self.gain < 0.0 {
            bail!("--gain value must be 0.0 or higher");
        }

        let mut config = ExperimentConfig::new();
        config.set_label(self.label.as_str());
        config.set_bins(self.bins as usize)?;
        config.set_min_gain(self.gain)?;
        config.set_min_samples_split(self.leafs);
        if !self.strategies.is_empty() {
            config.set_strategies(self.strategies.clone())?;
        }
        if let Some(model) = self.model {
            config.set_models(vec![model])?;
        }
        if let Some(split) = self.split {
            config.set_train_size(split)?;
        }
        if let Some(seed) = self.seed {
            config.set_seed(seed);
        }
        Ok(config)
    }

    fn out_dir(&self) -> PathBuf {
        match &self.out {
            Some(out) => out.clone(),
            None => self
                .train
                .parent()
                .filter(|parent| !parent.as_os_str().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
        }
    }
}

fn parse_model(s: &str) -> Result<ModelKind, String> {
    match s.trim().to_lowercase().as_str() {
        "nbc" | "bayes" | "naive-bayes" => Ok(ModelKind::NaiveBayes),
        "id3" | "tree" => Ok(ModelKind::Id3),
        other => Err(format!("unknown model '{}', expected bayes or id3", other)),
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_filter().into()),
        )
        .init();

    let config = args.config()?;

    let mut reader = DataReader::new().with_label(config.label());
    let mut declared = None;
    if let Some(path) = &args.structure {
        let structure = Structure::from_path(path)
            .with_context(|| format!("reading structure file {}", path.display()))?;
        declared = Some(structure.domains(config.label()));
        reader = reader.with_structure(structure);
    }

    let train = reader
        .read_path(&args.train)
        .with_context(|| format!("reading training file {}", args.train.display()))?;
    let test = match &args.test {
        Some(path) => Some(
            reader
                .read_path(path)
                .with_context(|| format!("reading test file {}", path.display()))?,
        ),
        None => None,
    };

    let mut experiment = Experiment::new(config, train, test)?;
    if let Some(declared) = declared {
        experiment = experiment.with_declared_domains(declared);
    }

    let rows = experiment.run()?;
    for row in &rows {
        println!("{}", row);
        println!("{}\n", row.confusion);
    }

    let path = write_overview_file(&rows, args.out_dir())?;
    println!("Overview table written to {}", path.display());
    Ok(())
}
