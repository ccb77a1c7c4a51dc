//! soxwrap-core - thin orchestration around the sox command line tool
//!
//! This crate builds argument vectors, shells out to sox (and an external
//! feature extractor), and turns the results into owned temp files or
//! parsed reports. All of the signal processing happens inside the
//! external binaries; the one piece of real logic here is the stats
//! report parser.

pub mod command;
pub mod config;
pub mod error;
pub mod exec;
pub mod input;
pub mod ops;
pub mod stats;

pub use config::{
    Channel, ConcatOptions, ConvertOptions, CustomOptions, FeatureOptions, SilenceOptions,
    SoxwrapConfig, SplitOptions, StatsOptions,
};
pub use error::SoxError;
pub use input::AudioSource;
pub use ops::{Sox, SplitOutput};
pub use stats::{parse_stats, ChannelStats, MetricMap, StatsReport};

/// Run the statistics report on a file with default settings.
pub fn stats_for_file(path: &str) -> anyhow::Result<StatsReport> {
    let sox = Sox::default();
    let report = sox.stats(AudioSource::path(path), &StatsOptions::default())?;
    Ok(report)
}
