#![allow(dead_code)]
//! ## Pipeline tests
//! - Cases are added in submodules from here, to be run by the
//!   [pipelines.rs](./../pipelines.rs) integration test.
//!
//! NOTE: *Cargo compiles each `.rs` file in the top level of `tests/` as a
//!       separate crate. Subdirectories are only available as modules.

use std::sync::Arc;

use strata::{
    plan::{self, Key, Operator, Plan, Scalar},
    ElementShape, FnTableFunction, ListTable, MapSchema, MutableSchema, Parameter, Row,
    ScalarType, Schema, Value,
};
use tracing_subscriber::EnvFilter;

pub mod compile;
pub mod end_to_end;

/// Log to the test output, filtered by `RUST_LOG`.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn ids() -> ElementShape {
    ElementShape::tuple([("id", ScalarType::Int)])
}

pub fn orders_shape() -> ElementShape {
    ElementShape::tuple([
        ("id", ScalarType::Int),
        ("item", ScalarType::Str),
        ("quantity", ScalarType::Int),
    ])
}

pub fn order(id: i64, item: &str, quantity: i64) -> Row {
    Row::tuple([Value::Int(id), Value::str(item), Value::Int(quantity)])
}

pub fn int(i: i64) -> Row {
    Row::Scalar(Value::Int(i))
}

/// A root with `orders`, and a `sales` sub-schema holding `returns` and the
/// `range` table function (with `range(n)` and `range(from, to)` overloads).
pub fn shop() -> MapSchema {
    let mut root = MapSchema::root();
    root.add_rows(
        "orders",
        orders_shape(),
        [
            order(1, "pen", 2),
            order(2, "ink", 1),
            order(3, "pen", 5),
            order(4, "pad", 3),
        ],
    );

    let sales = MapSchema::create(&mut root, "sales");
    sales.add_rows("returns", ids(), [Row::tuple([Value::Int(3)])]);
    sales.add_table_function("range", range(1));
    sales.add_table_function("range", range(2));
    root
}

/// Integers in `0..n`, or `from..to`.
pub fn range(arity: usize) -> Arc<FnTableFunction> {
    let params = ["from", "to"][2 - arity..]
        .iter()
        .map(|name| Parameter::new(name, ScalarType::Int))
        .collect();
    Arc::new(FnTableFunction::new(
        params,
        ElementShape::Scalar(ScalarType::Int),
        move |args| {
            let bounds = args.iter().map(|arg| arg.as_int().unwrap_or(0)).collect::<Vec<_>>();
            let (from, to) = match bounds.as_slice() {
                [to] => (0, *to),
                [from, to] => (*from, *to),
                _ => (0, 0),
            };
            Ok(Arc::new(ListTable::new(
                ElementShape::Scalar(ScalarType::Int),
                strata::Navigation::root().sub_schema("sales").call("range", args.to_vec()),
                (from..to).map(int),
            )))
        },
    ))
}

pub fn scan(plan: &mut Plan, schema: &[&str], table: &str, shape: ElementShape) -> Key<Operator> {
    plan.insert(plan::Scan {
        schema: schema.iter().map(|name| name.to_string()).collect(),
        table: table.to_owned(),
        shape,
    })
}

pub fn field_equals(index: usize, value: Value) -> Scalar {
    Scalar::column(index).equals(&Scalar::literal(value))
}

pub fn first_fields(rows: &[Row]) -> Vec<Value> {
    rows.iter().map(|row| row.values()[0].clone()).collect()
}

/// The schema resolved by a path of names.
pub fn at<'a>(root: &'a dyn Schema, path: &[&str]) -> &'a dyn Schema {
    path.iter().fold(root, |schema, name| {
        schema.resolve_sub_schema(name).expect("sub-schema exists")
    })
}
