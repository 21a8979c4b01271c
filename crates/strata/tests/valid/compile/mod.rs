//! # Compiler behaviour
//! Traversal order, sharing of sub-plans, naming and rendering.

pub mod options;
pub mod post_order;
pub mod sharing;
