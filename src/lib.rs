//! Donation ML - пайплайн прогнозирования донорства крови

pub mod data;
pub mod error;
pub mod evaluation;
pub mod models;
pub mod pipeline;
pub mod preprocessing;
pub mod report;
pub mod types;

pub use data::*;
pub use error::{Error, Result};
pub use evaluation::*;
pub use models::*;
pub use preprocessing::*;
pub use types::*;

// Re-export для удобства
pub use pipeline::{run, PipelineConfig, PipelineSummary};
pub use report::{DiscardSink, Figure, FigureSink, LogSink, Reporter};
