//! # The catalog
//! A hierarchical namespace of tables, overloaded table functions and child
//! schemas. Each of the three namespaces is independent, so a table and a
//! table function may share a name.
//!
//! ## Resolution
//! Looking up a name by [`Schema::resolve_table`] tries the tables first, then
//! a zero parameter overload of a table function of the same name. Absence is
//! [`Resolution::NotFound`], not an error.
//!
//! ## Sharing
//! Compilation borrows a schema immutably, and mutation needs `&mut`, so a
//! catalog cannot change while a plan is compiled against it. To share a
//! catalog between threads, finish populating it and then publish it behind
//! an [`std::sync::Arc`].

use std::{any::Any, sync::Arc};

use tracing::{instrument, trace};

use crate::{
    error::CatalogError,
    function::TableFunction,
    table::Table,
    value::{ElementShape, Value},
};

mod map;
mod navigation;

pub use map::MapSchema;
pub use navigation::{Narrowing, Navigation, Step};

/// The outcome of a catalog lookup.
pub enum Resolution {
    Table(Arc<dyn Table>),
    /// Obtained by applying a table function.
    Function {
        function: Arc<dyn TableFunction>,
        table: Arc<dyn Table>,
    },
    NotFound,
}

impl Resolution {
    pub fn is_found(&self) -> bool {
        !matches!(self, Resolution::NotFound)
    }

    pub fn table(&self) -> Option<&Arc<dyn Table>> {
        match self {
            Resolution::Table(table) | Resolution::Function { table, .. } => Some(table),
            Resolution::NotFound => None,
        }
    }

    pub fn into_table(self) -> Option<Arc<dyn Table>> {
        match self {
            Resolution::Table(table) | Resolution::Function { table, .. } => Some(table),
            Resolution::NotFound => None,
        }
    }
}

pub trait Schema: Any + Send + Sync {
    /// How to re-obtain this schema from the root.
    fn navigation(&self) -> &Navigation;

    fn table(&self, name: &str) -> Option<Arc<dyn Table>>;

    /// All overloads for `name` in insertion order, empty if there are none.
    fn table_functions(&self, name: &str) -> &[Arc<dyn TableFunction>];

    fn resolve_sub_schema(&self, name: &str) -> Option<&dyn Schema>;

    fn table_names(&self) -> Vec<&str>;
    fn function_names(&self) -> Vec<&str>;
    fn sub_schema_names(&self) -> Vec<&str>;

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;

    #[instrument(name = "schema::resolve_table", level = "trace", skip(self))]
    fn resolve_table(&self, name: &str) -> Result<Resolution, CatalogError> {
        if let Some(table) = self.table(name) {
            return Ok(Resolution::Table(table));
        }
        match self
            .table_functions(name)
            .iter()
            .find(|function| function.parameters().is_empty())
        {
            Some(function) => {
                trace!(name, "applying zero parameter table function");
                Ok(Resolution::Function {
                    function: function.clone(),
                    table: function.apply(&[])?,
                })
            }
            None => Ok(Resolution::NotFound),
        }
    }

    /// As [`Schema::resolve_table`], failing if the table found does not have
    /// the `expected` shape.
    fn resolve_table_typed(
        &self,
        name: &str,
        expected: &ElementShape,
    ) -> Result<Resolution, CatalogError> {
        let resolution = self.resolve_table(name)?;
        if let Some(table) = resolution.table() {
            if !table.shape().is_compatible(expected) {
                return Err(CatalogError::ShapeMismatch {
                    name: name.to_owned(),
                    expected: expected.clone(),
                    found: table.shape().clone(),
                });
            }
        }
        Ok(resolution)
    }

    /// Apply the first overload (in insertion order) accepting `args`.
    #[instrument(name = "schema::resolve_function", level = "trace", skip(self))]
    fn resolve_function(&self, name: &str, args: &[Value]) -> Result<Resolution, CatalogError> {
        match self
            .table_functions(name)
            .iter()
            .find(|function| function.accepts(args))
        {
            Some(function) => Ok(Resolution::Function {
                function: function.clone(),
                table: function.apply(args)?,
            }),
            None => Ok(Resolution::NotFound),
        }
    }

    fn table_navigation(&self, name: &str) -> Navigation {
        self.navigation().clone().table(name)
    }

    /// The navigation to a sub-schema, narrowed to a concrete schema type
    /// when `narrowing` is provided.
    fn sub_schema_navigation(&self, name: &str, narrowing: Option<Narrowing>) -> Navigation {
        let navigation = self.navigation().clone().sub_schema(name);
        match narrowing {
            Some(narrowing) => navigation.narrow(narrowing),
            None => navigation,
        }
    }
}

/// Follow a path of sub-schema names from a schema.
pub fn resolve_path<'a>(schema: &'a dyn Schema, path: &[String]) -> Option<&'a dyn Schema> {
    path.iter()
        .try_fold(schema, |schema, name| schema.resolve_sub_schema(name))
}

pub trait MutableSchema: Schema {
    /// Replaces any table of the same name.
    fn add_table(&mut self, name: &str, table: Arc<dyn Table>);

    /// Replaces any sub-schema of the same name.
    fn add_schema(&mut self, name: &str, schema: Box<dyn Schema>);

    /// Appends to the overloads of `name`.
    fn add_table_function(&mut self, name: &str, function: Arc<dyn TableFunction>);
}
