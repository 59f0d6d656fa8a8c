// core/src/pipeline/mod.rs

//! A small async workflow engine: named steps with before/on/after handlers
//! sharing one `ContextData<T>`. Order placement, status changes and inbound
//! message handling are all expressed as pipelines.

pub mod context_data;
pub mod control;
pub mod definition;
pub mod execution;
pub mod hooks;
pub mod step;

pub use context_data::ContextData;
pub use control::{PipelineControl, PipelineResult};
pub use definition::{Handler, Pipeline};
pub use step::{SkipCondition, StepDef};
