pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod io;
pub mod matching;
pub mod utils;

pub use adapters::SqliteUsageCounter;
pub use config::{cli::LocalStorage, MatchConfig};

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use core::{etl::EtlEngine, pipeline::MatchPipeline};
pub use domain::model::{MatchMode, MatchOptions, RankOrder, Report, ReportRow, Table};
pub use matching::run_matching;
pub use utils::error::{MatchError, Result};
