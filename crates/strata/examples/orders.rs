//! Builds a small shop catalog, compiles a plan joining orders against
//! returns, prints the rendered program and runs it.
//!
//! Run with `RUST_LOG=debug` to see catalog and compiler events.

use std::{error::Error, sync::Arc};

use strata::{
    compile,
    plan::{self, AggCall, AggKind, JoinKind, Plan, Scalar, SortOrder},
    CompileOptions, ElementShape, FnTableFunction, ListTable, MapSchema, MutableSchema,
    Parameter, Row, ScalarType, Schema, Value,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn catalog() -> MapSchema {
    let mut root = MapSchema::root();
    root.add_rows(
        "orders",
        ElementShape::tuple([
            ("id", ScalarType::Int),
            ("item", ScalarType::Str),
            ("quantity", ScalarType::Int),
        ]),
        [
            (1, "pen", 2),
            (2, "ink", 1),
            (3, "pen", 5),
            (4, "pad", 3),
            (5, "ink", 4),
        ]
        .map(|(id, item, quantity)| {
            Row::tuple([Value::Int(id), Value::str(item), Value::Int(quantity)])
        }),
    );

    let sales = MapSchema::create(&mut root, "sales");
    let navigation = sales.navigation().clone();
    sales.add_table_function(
        "returned",
        Arc::new(FnTableFunction::new(
            vec![Parameter::new("after", ScalarType::Int)],
            ElementShape::tuple([("id", ScalarType::Int)]),
            move |args| {
                let after = args[0].as_int().unwrap_or(0);
                Ok(Arc::new(ListTable::new(
                    ElementShape::tuple([("id", ScalarType::Int)]),
                    navigation.clone().call("returned", args.to_vec()),
                    [3, 5]
                        .into_iter()
                        .filter(move |id| *id > after)
                        .map(|id| Row::tuple([Value::Int(id)])),
                )))
            },
        )),
    );
    root
}

fn plan() -> (Plan, plan::Key<plan::Operator>) {
    let mut plan = Plan::new();
    let orders = plan.insert(plan::Scan {
        schema: Vec::new(),
        table: String::from("orders"),
        shape: ElementShape::tuple([
            ("id", ScalarType::Int),
            ("item", ScalarType::Str),
            ("quantity", ScalarType::Int),
        ]),
    });
    let returned = plan.insert(plan::Call {
        schema: vec![String::from("sales")],
        function: String::from("returned"),
        args: vec![Value::Int(0)],
        shape: ElementShape::tuple([("id", ScalarType::Int)]),
    });
    let joined = plan.insert(plan::Join {
        left: orders,
        right: returned,
        kind: JoinKind::Equi {
            left: vec![Scalar::column(0)],
            right: vec![Scalar::column(0)],
        },
    });
    let per_item = plan.insert(plan::Aggregate {
        input: joined,
        group_by: vec![Scalar::column(1)],
        calls: vec![AggCall {
            kind: AggKind::Sum,
            arg: Some(Scalar::column(2)),
        }],
        shape: ElementShape::tuple([("item", ScalarType::Str), ("returned", ScalarType::Int)]),
    });
    let sorted = plan.insert(plan::Sort {
        input: per_item,
        keys: vec![(Scalar::column(1), SortOrder::Desc)],
    });
    (plan, sorted)
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let root = catalog();
    let (plan, returns_per_item) = plan();
    let options = CompileOptions {
        pipeline_name: Some(String::from("returns_per_item")),
        ..Default::default()
    };
    let program = compile(&plan, returns_per_item, &root, &options)?;
    info!(
        registered = program.registry().len(),
        scalars = program.scalars().len(),
        "compiled returns per item"
    );

    println!("{}", program.pretty()?);
    for row in program.execute(&root)? {
        println!("{row:?}");
    }
    Ok(())
}
