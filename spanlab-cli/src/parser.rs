//! CLI argument parsing and structure definitions

use clap::{Parser, Subcommand, ValueEnum};

use crate::commands;

/// Span labelings and online classification
#[derive(Parser)]
#[command(name = "spanlab")]
#[command(
    author,
    version,
    about = "Span labelings and online classification",
    long_about = r#"
spanlab - replay labeling operation logs and train kernel perceptrons

EXAMPLES:
  spanlab labels --docs corpus/ --ops gold.ops --format strings --offsets
  spanlab labels --docs corpus/ --ops gold.ops --format markup --doc d17
  spanlab train --train train.txt --test test.txt --degree 0 --mode averaged

Set RUST_LOG (e.g. RUST_LOG=debug) for replay and training traces.
"#
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Replay an operation log over a document directory and print the labeling
    #[command(visible_alias = "l")]
    Labels(commands::LabelsArgs),

    /// Train a kernel voted perceptron and report accuracy
    #[command(visible_alias = "t")]
    Train(commands::TrainArgs),
}

/// How `labels` prints the labeling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LabelFormat {
    /// Operation log, readable by `--ops`
    #[default]
    Ops,
    /// One `TYPE<TAB>text` line per instance
    Strings,
    /// Flat `<extractions>` listing
    Xml,
    /// Inline XML per document
    Markup,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_train_overrides() {
        let cli = Cli::try_parse_from([
            "spanlab", "train", "--train", "t.txt", "--degree", "-2", "--mode", "AVERAGED",
        ])
        .unwrap();
        match cli.command {
            Commands::Train(args) => {
                assert_eq!(args.degree, Some(-2));
                assert_eq!(args.mode, Some(spanlab::learn::VotingMode::Averaged));
                assert!(!args.speedup);
            }
            Commands::Labels(_) => panic!("expected train"),
        }
    }

    #[test]
    fn labels_defaults_to_ops_format() {
        let cli =
            Cli::try_parse_from(["spanlab", "labels", "--docs", "d", "--ops", "g.ops"]).unwrap();
        match cli.command {
            Commands::Labels(args) => {
                assert_eq!(args.format, LabelFormat::Ops);
                assert!(args.policy.is_none());
            }
            Commands::Train(_) => panic!("expected labels"),
        }
    }
}
