use crate::domain::model::{InvalidAmountPolicy, Journal, OutputFormat, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    Missing,
}

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn entry_kind(&self, path: &str) -> impl std::future::Future<Output = Result<EntryKind>> + Send;
    /// Names of the regular files directly inside `dir`, sorted.
    fn list_files(&self, dir: &str)
        -> impl std::future::Future<Output = Result<Vec<String>>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn report_filename(&self) -> Option<&str>;
    fn output_format(&self) -> OutputFormat;
    fn unit_letters(&self) -> &str;
    /// 1-based, as a spreadsheet user counts columns.
    fn unit_column(&self) -> usize;
    /// 1-based.
    fn amount_column(&self) -> usize;
    fn total_label(&self) -> &str;
    fn on_invalid_amount(&self) -> InvalidAmountPolicy;
    fn include_summary(&self) -> bool;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<Journal>>;
    async fn transform(&self, journals: Vec<Journal>) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}
