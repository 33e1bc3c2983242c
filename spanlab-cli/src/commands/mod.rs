//! Subcommand implementations

pub mod labels;
pub mod train;

pub use labels::LabelsArgs;
pub use train::TrainArgs;
