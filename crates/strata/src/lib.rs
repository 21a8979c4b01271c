//! # Strata
//! Compiles relational operator plans against a hierarchical catalog, into
//! programs of named lazy pipelines.
//!
//! The compiler and catalog live in [`strata_core`], and the physical
//! operators used to run programs in [`conveyor`].

pub use strata_core::*;

pub mod dependencies {
    pub use conveyor;
}
