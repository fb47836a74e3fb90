pub mod etl;
pub mod filter;
pub mod journal;
pub mod pipeline;
pub mod report;

pub use crate::domain::model::{Journal, TransformResult};
pub use crate::domain::ports::{ConfigProvider, EntryKind, Pipeline, Storage};
pub use crate::utils::error::Result;
