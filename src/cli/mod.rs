//! Command-line layer: the workflow behind the binary.

pub mod orchestration;

pub use orchestration::{run_tag_workflow, TagWorkflowArgs, WorkflowResult};
