//! # Strata Core
//! Compiles relational operator plans, resolved against a hierarchical
//! catalog, into programs of named lazy row pipelines.
//!
//! ## Structure
//! - [`value`] rows, values and the shapes describing them.
//! - [`table`] and [`function`] the contracts for data sources, and
//!   parameterised generators of them.
//! - [`schema`] the catalog, and [`schema::Navigation`] paths for re-obtaining
//!   catalog entries from the root.
//! - [`plan`] an arena of operators, where a sub-plan may have many consumers.
//! - [`compile`] the [`compile::Implementor`] producing a [`compile::Program`].
//! - [`exec`] runs programs using [`conveyor`] operators.

pub mod compile;
pub mod error;
pub mod exec;
pub mod function;
pub mod plan;
pub mod schema;
pub mod table;
pub mod value;

pub use compile::{compile, CompileOptions, Program};
pub use error::{CatalogError, CompileError, ExecError, SourceError};
pub use function::{FnTableFunction, Parameter, TableFunction};
pub use schema::{MapSchema, MutableSchema, Narrowing, Navigation, Resolution, Schema};
pub use table::{ListTable, RowStream, Table};
pub use value::{Column, ElementShape, Row, ScalarType, Value};
