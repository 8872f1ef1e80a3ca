pub mod etl;
pub mod pipeline;

pub use crate::domain::ports::{ConfigProvider, MatchInputs, Pipeline, ProgressSink, Storage, UsageCounter};
pub use crate::utils::error::Result;
