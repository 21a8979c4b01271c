//! Programs hold navigations, and can run against any root with the same
//! layout. A narrowing step checks the type of the schema found.

use std::{any::Any, sync::Arc};

use strata::{
    compile, function::TableFunction, plan::Plan, table::Table, CompileOptions, ExecError,
    MapSchema, MutableSchema, Narrowing, Navigation, Row, Schema, Value,
};

use super::super::{first_fields, ids, scan, shop};

/// A schema with a single fixed table.
struct Fixed {
    navigation: Navigation,
    table: Arc<dyn Table>,
}

impl Schema for Fixed {
    fn navigation(&self) -> &Navigation {
        &self.navigation
    }

    fn table(&self, name: &str) -> Option<Arc<dyn Table>> {
        (name == "returns").then(|| self.table.clone())
    }

    fn table_functions(&self, _name: &str) -> &[Arc<dyn TableFunction>] {
        &[]
    }

    fn resolve_sub_schema(&self, _name: &str) -> Option<&dyn Schema> {
        None
    }

    fn table_names(&self) -> Vec<&str> {
        vec!["returns"]
    }

    fn function_names(&self) -> Vec<&str> {
        Vec::new()
    }

    fn sub_schema_names(&self) -> Vec<&str> {
        Vec::new()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

pub fn test() {
    assert!(Narrowing::of::<dyn Schema>().is_none());

    let root = shop();
    let mut plan = Plan::new();
    let returns = scan(&mut plan, &["sales"], "returns", ids());
    let program = compile(&plan, returns, &root, &CompileOptions::default()).unwrap();

    // a different catalog, laid out the same way
    let mut other = shop();
    MapSchema::create(&mut other, "sales").add_rows("returns", ids(), [Row::tuple([Value::Int(9)])]);
    assert_eq!(first_fields(&program.collect(&other).unwrap()), vec![Value::Int(9)]);

    // the same names, but `sales` is not a map schema
    let mut mismatched = MapSchema::root();
    let navigation = mismatched.sub_schema_navigation("sales", None);
    let table = strata::ListTable::new(ids(), navigation.clone().table("returns"), []);
    mismatched.add_schema(
        "sales",
        Box::new(Fixed {
            navigation,
            table: Arc::new(table),
        }),
    );
    match program.collect(&mismatched) {
        Err(ExecError::Navigation { path, reason }) => {
            assert!(path.starts_with("root.sales"));
            assert!(reason.contains("MapSchema"));
        }
        _ => panic!("narrowing to a map schema fails"),
    }

    // without a narrowing the fixed schema is navigable
    let plain = Navigation::root().sub_schema("sales").table("returns");
    assert!(plain.resolve_table(&mismatched).is_ok());
}
