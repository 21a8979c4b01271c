//! # Running compiled plans
//! Whole pipelines, from catalog setup to collected rows.

pub mod equi_join;
pub mod strategies_agree;
pub mod table_functions;
