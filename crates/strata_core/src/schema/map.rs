use std::{any::Any, collections::HashMap, sync::Arc};

use itertools::Itertools;
use smallvec::SmallVec;
use tracing::{debug, instrument};

use super::{MutableSchema, Narrowing, Navigation, Schema};
use crate::{
    function::TableFunction,
    table::{ListTable, Table},
    value::{ElementShape, Row},
};

/// Overloads for one name, stored inline until a second arrives.
type Overloads = SmallVec<[Arc<dyn TableFunction>; 1]>;

/// A schema backed by hash maps.
pub struct MapSchema {
    navigation: Navigation,
    tables: HashMap<String, Arc<dyn Table>>,
    functions: HashMap<String, Overloads>,
    sub_schemas: HashMap<String, Box<dyn Schema>>,
}

impl MapSchema {
    pub fn new(navigation: Navigation) -> Self {
        Self {
            navigation,
            tables: HashMap::new(),
            functions: HashMap::new(),
            sub_schemas: HashMap::new(),
        }
    }

    pub fn root() -> Self {
        Self::new(Navigation::root())
    }

    /// Create an empty child of `parent` called `name`, and return it for
    /// population. The child's navigation narrows to [`MapSchema`].
    #[instrument(name = "schema::create", level = "debug", skip(parent))]
    pub fn create<'a>(parent: &'a mut MapSchema, name: &str) -> &'a mut MapSchema {
        let navigation = parent.sub_schema_navigation(name, Narrowing::of::<MapSchema>());
        parent.add_schema(name, Box::new(MapSchema::new(navigation)));
        parent
            .sub_map_mut(name)
            .expect("a newly added sub-schema is present")
    }

    pub fn sub_schema_mut(&mut self, name: &str) -> Option<&mut (dyn Schema + 'static)> {
        self.sub_schemas.get_mut(name).map(|schema| schema.as_mut())
    }

    /// A sub-schema that is itself a [`MapSchema`].
    pub fn sub_map_mut(&mut self, name: &str) -> Option<&mut MapSchema> {
        self.sub_schema_mut(name)?.as_any_mut().downcast_mut()
    }

    pub fn functions(&self) -> &HashMap<String, Overloads> {
        &self.functions
    }

    /// Add an in-memory table, navigable from this schema.
    pub fn add_rows(&mut self, name: &str, shape: ElementShape, rows: impl IntoIterator<Item = Row>) {
        let table = ListTable::new(shape, self.table_navigation(name), rows);
        self.add_table(name, Arc::new(table));
    }
}

impl Schema for MapSchema {
    fn navigation(&self) -> &Navigation {
        &self.navigation
    }

    fn table(&self, name: &str) -> Option<Arc<dyn Table>> {
        self.tables.get(name).cloned()
    }

    fn table_functions(&self, name: &str) -> &[Arc<dyn TableFunction>] {
        self.functions.get(name).map_or(&[][..], |overloads| overloads.as_slice())
    }

    fn resolve_sub_schema(&self, name: &str) -> Option<&dyn Schema> {
        self.sub_schemas.get(name).map(|schema| schema.as_ref())
    }

    fn table_names(&self) -> Vec<&str> {
        self.tables.keys().map(String::as_str).sorted().collect()
    }

    fn function_names(&self) -> Vec<&str> {
        self.functions.keys().map(String::as_str).sorted().collect()
    }

    fn sub_schema_names(&self) -> Vec<&str> {
        self.sub_schemas.keys().map(String::as_str).sorted().collect()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl MutableSchema for MapSchema {
    #[instrument(name = "schema::add_table", level = "debug", skip(self, table), fields(schema = %self.navigation))]
    fn add_table(&mut self, name: &str, table: Arc<dyn Table>) {
        assert!(!name.is_empty(), "tables must be named");
        if self.tables.insert(name.to_owned(), table).is_some() {
            debug!(name, "replaced existing table");
        }
    }

    #[instrument(name = "schema::add_schema", level = "debug", skip(self, schema), fields(schema = %self.navigation))]
    fn add_schema(&mut self, name: &str, schema: Box<dyn Schema>) {
        assert!(!name.is_empty(), "sub-schemas must be named");
        assert!(
            schema.navigation().is_sub_schema_of(&self.navigation, name),
            "sub-schema `{name}` of {} navigates from {}",
            self.navigation,
            schema.navigation()
        );
        if self.sub_schemas.insert(name.to_owned(), schema).is_some() {
            debug!(name, "replaced existing sub-schema");
        }
    }

    #[instrument(name = "schema::add_table_function", level = "debug", skip(self, function), fields(schema = %self.navigation))]
    fn add_table_function(&mut self, name: &str, function: Arc<dyn TableFunction>) {
        assert!(!name.is_empty(), "table functions must be named");
        let overloads = self.functions.entry(name.to_owned()).or_default();
        overloads.push(function);
        debug!(name, overloads = overloads.len(), "added overload");
    }
}
