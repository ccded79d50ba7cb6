pub mod climate;
pub mod environment;
pub mod feasibility;
pub mod file_formats;
pub mod potential;
pub mod property;
pub mod report;
pub mod request;
pub mod soil;
pub mod structure;
pub mod tea_lca;
pub mod tuning;
