pub mod builder;
pub mod engine;

pub use builder::AnalysisBuilder;
pub use engine::AnalysisEngine;
