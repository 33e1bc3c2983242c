//! Train command - fit a kernel voted perceptron on an example file

use clap::Parser;
use std::path::PathBuf;

use spanlab::learn::{
    accuracy, load_examples, KernelVotedPerceptron, KvpConfig, OnlineBinaryLearner, VotingMode,
};
use spanlab::Config;

use crate::output::{format_error, log_info, percent};

/// Train on one example file, optionally evaluate on another
#[derive(Parser, Debug)]
pub struct TrainArgs {
    /// Training examples (`+1 feat:val ...` per line)
    #[arg(long, value_name = "FILE")]
    pub train: PathBuf,

    /// Held-out examples to report accuracy on
    #[arg(long, value_name = "FILE")]
    pub test: Option<PathBuf>,

    /// TOML config; flags below override its [kvp] section
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Kernel degree (0 = linear)
    #[arg(long, allow_negative_numbers = true)]
    pub degree: Option<i64>,

    /// voted or averaged
    #[arg(long)]
    pub mode: Option<VotingMode>,

    /// Kernel additive constant
    #[arg(long, allow_negative_numbers = true)]
    pub coef0: Option<f64>,

    /// Kernel dot-product scale
    #[arg(long, allow_negative_numbers = true)]
    pub gamma: Option<f64>,

    /// Only consult the most recent support vectors at prediction time
    #[arg(long)]
    pub speedup: bool,

    /// How many support vectors --speedup keeps
    #[arg(long)]
    pub max_vectors: Option<usize>,

    /// Suppress progress messages
    #[arg(short, long)]
    pub quiet: bool,
}

impl TrainArgs {
    /// File config with flag overrides applied.
    fn kvp_config(&self) -> Result<KvpConfig, String> {
        let mut kvp = match &self.config {
            Some(path) => {
                Config::from_file(path)
                    .map_err(|e| format_error(&format!("config {}", path.display()), e))?
                    .kvp
            }
            None => KvpConfig::default(),
        };
        if let Some(degree) = self.degree {
            kvp.degree = degree;
        }
        if let Some(mode) = self.mode {
            kvp.mode = mode;
        }
        if let Some(coef0) = self.coef0 {
            kvp.coef0 = coef0;
        }
        if let Some(gamma) = self.gamma {
            kvp.gamma = gamma;
        }
        if self.speedup {
            kvp.speedup = true;
        }
        if let Some(max_vectors) = self.max_vectors {
            kvp.max_vectors = max_vectors;
        }
        Ok(kvp)
    }
}

pub fn run(args: TrainArgs) -> Result<(), String> {
    let config = args.kvp_config()?;
    log::debug!("kvp config: {:?}", config);
    let mut learner = KernelVotedPerceptron::new(config).map_err(|e| format_error("config", e))?;

    let train = load_examples(&args.train)
        .map_err(|e| format_error(&format!("reading {}", args.train.display()), e))?;
    log_info(
        &format!("training on {} examples from {}", train.len(), args.train.display()),
        args.quiet,
    );
    learner.add_examples(&train);

    let classifier = learner.get_classifier();
    println!("{}", classifier);
    println!("train accuracy: {}", percent(accuracy(&classifier, &train)));

    if let Some(path) = &args.test {
        let test = load_examples(path)
            .map_err(|e| format_error(&format!("reading {}", path.display()), e))?;
        println!(
            "test accuracy:  {} ({} examples)",
            percent(accuracy(&classifier, &test)),
            test.len()
        );
    }
    Ok(())
}
