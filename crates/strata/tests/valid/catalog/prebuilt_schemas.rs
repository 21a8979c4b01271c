//! A schema built separately and then registered must navigate from its new
//! parent, so scans read the table they were checked against.

use std::panic::{catch_unwind, AssertUnwindSafe};

use strata::{compile, plan::Plan, CompileOptions, MapSchema, MutableSchema, Schema, Value};

use super::super::{first_fields, ids, scan};

pub fn test() {
    let mut root = MapSchema::root();
    root.add_rows("orders", ids(), [1, 2].map(|id| strata::Row::tuple([Value::Int(id)])));

    // built as a root, so its entries navigate to the root's `orders`
    let mut detached = MapSchema::root();
    detached.add_rows("orders", ids(), [strata::Row::tuple([Value::Int(9)])]);
    let registered = catch_unwind(AssertUnwindSafe(|| {
        root.add_schema("sales", Box::new(detached));
    }));
    assert!(registered.is_err());
    assert!(root.resolve_sub_schema("sales").is_none());

    // built from the parent's navigation
    let mut sales = MapSchema::new(root.sub_schema_navigation("sales", None));
    sales.add_rows("orders", ids(), [strata::Row::tuple([Value::Int(9)])]);
    root.add_schema("sales", Box::new(sales));

    let mut plan = Plan::new();
    let orders = scan(&mut plan, &["sales"], "orders", ids());
    let program = compile(&plan, orders, &root, &CompileOptions::default()).unwrap();
    assert_eq!(first_fields(&program.collect(&root).unwrap()), vec![Value::Int(9)]);

    let mut plan = Plan::new();
    let orders = scan(&mut plan, &[], "orders", ids());
    let program = compile(&plan, orders, &root, &CompileOptions::default()).unwrap();
    assert_eq!(program.collect(&root).unwrap().len(), 2);
}
