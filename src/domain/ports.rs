use crate::domain::model::{MatchOptions, Report, Table};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn contacts_path(&self) -> &str;
    fn roster_path(&self) -> &str;
    fn output_path(&self) -> &str;
    /// Report file name without extension.
    fn output_filename(&self) -> &str;
    fn output_formats(&self) -> &[String];
    fn match_options(&self) -> MatchOptions;
}

/// The two tables the engine consumes.
#[derive(Debug, Clone, Default)]
pub struct MatchInputs {
    pub contacts: Table,
    pub roster: Table,
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<MatchInputs>;
    async fn transform(&self, inputs: MatchInputs) -> Result<Report>;
    async fn load(&self, report: Report) -> Result<String>;
}

/// 進度回報：每處理一筆聯絡人呼叫一次，數值為整數百分比
pub trait ProgressSink: Send + Sync {
    fn on_progress(&self, percent: u8);
}

impl<F> ProgressSink for F
where
    F: Fn(u8) + Send + Sync,
{
    fn on_progress(&self, percent: u8) {
        self(percent)
    }
}

/// Progress sink that discards every event.
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn on_progress(&self, _percent: u8) {}
}

/// 使用次數計數器，由呼叫端在成功比對後遞增
pub trait UsageCounter {
    fn current(&self) -> Result<u64>;
    fn increment(&self) -> Result<u64>;
}
