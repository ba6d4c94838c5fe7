//! Application layer: the chain stages and the pipeline orchestrator.

pub mod critique;
pub mod pipeline;
pub mod role_analysis;
pub mod stage;
pub mod template_synthesis;

pub use critique::CritiqueStage;
pub use pipeline::{PipelineConfig, PromptPipeline};
pub use role_analysis::RoleAnalysisStage;
pub use stage::{ChainStage, PipelineError};
pub use template_synthesis::TemplateSynthesisStage;
