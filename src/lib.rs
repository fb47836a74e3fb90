pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::{cli::LocalStorage, toml_config::TomlConfig, CliConfig};
pub use core::{etl::EtlEngine, pipeline::UnitAggregationPipeline};
pub use domain::model::{InvalidAmountPolicy, OutputFormat};
pub use utils::error::{AggError, Result};
