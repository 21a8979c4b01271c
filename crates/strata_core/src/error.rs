//! Errors for each stage: data sources, catalog lookups, compilation and
//! execution.
//!
//! Absence of a catalog entry is not an error, see [`crate::schema::Resolution`].

use std::{io, path::PathBuf};

use thiserror::Error;

use crate::{compile::Name, value::ElementShape};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("data source for table `{table}` is unreachable: {reason}")]
    Unreachable { table: String, reason: String },
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("table `{name}` has shape {found}, but {expected} was expected")]
    ShapeMismatch {
        name: String,
        expected: ElementShape,
        found: ElementShape,
    },
    #[error("failed to apply table function `{name}`: {reason}")]
    Application { name: String, reason: String },
    #[error(transparent)]
    Source(#[from] SourceError),
}

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("no schema at `{path}`")]
    SchemaNotFound { path: String },
    #[error("no table `{name}` in schema `{schema}`")]
    TableNotFound { schema: String, name: String },
    #[error("no overload of `{name}` accepts {arity} argument(s)")]
    NoMatchingOverload { name: String, arity: usize },
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("generated code could not be parsed: {0}")]
    Render(String),
    #[error("failed to write debug output to {path:?}")]
    DebugOutput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ExecError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("could not navigate to `{path}`: {reason}")]
    Navigation { path: String, reason: String },
    #[error("`{0}` is used before it is bound")]
    UndefinedBinding(Name),
}
