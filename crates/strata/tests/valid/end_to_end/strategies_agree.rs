use strata::{
    compile,
    dependencies::conveyor::{Basic, Iter},
    plan::{self, AggCall, AggKind, JoinKind, Scalar},
    CompileOptions, ElementShape, ScalarType, Value,
};

use super::super::{ids, orders_shape, scan, shop};

/// The lazy and eager operators produce the same rows.
pub fn test() {
    let root = shop();
    let mut plan = plan::Plan::new();
    let orders = scan(&mut plan, &[], "orders", orders_shape());
    let returns = scan(&mut plan, &["sales"], "returns", ids());
    let joined = plan.insert(plan::Join {
        left: orders,
        right: returns,
        kind: JoinKind::Predicate(Scalar::new("#0 != #3", |row| {
            Value::Bool(row.field(0) != row.field(3))
        })),
    });
    let per_item = plan.insert(plan::Aggregate {
        input: joined,
        group_by: vec![Scalar::column(1)],
        calls: vec![AggCall {
            kind: AggKind::Min,
            arg: Some(Scalar::column(2)),
        }],
        shape: ElementShape::tuple([("item", ScalarType::Str), ("least", ScalarType::Int)]),
    });
    let root_op = plan.insert(plan::Take {
        input: per_item,
        n: 2,
    });

    let options = CompileOptions {
        bind_intermediates: true,
        ..Default::default()
    };
    let program = compile(&plan, root_op, &root, &options).unwrap();

    let lazy = program.execute_with::<Iter>(&root).unwrap().collect::<Vec<_>>();
    let eager = program.execute_with::<Basic>(&root).unwrap().collect::<Vec<_>>();
    assert_eq!(lazy, eager);
    assert_eq!(
        lazy,
        vec![
            strata::Row::tuple([Value::str("pen"), Value::Int(2)]),
            strata::Row::tuple([Value::str("ink"), Value::Int(1)]),
        ]
    );
}
