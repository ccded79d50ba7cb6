//! Rooftop rainwater harvesting analysis.
//!
//! A request is validated, resolved against climate and soil sources, and
//! then run through deterministic harvest, feasibility, structure, cost and
//! finance stages. See [`pipeline::AnalysisBuilder`].

pub mod composer;
pub mod cost;
pub mod error;
pub mod export;
pub mod feasibility;
pub mod finance;
pub mod harvest;
pub mod knowledge_base;
pub mod pipeline;
pub mod resolver;
pub mod structures;
pub mod validation;
