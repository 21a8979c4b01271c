use strata::{
    compile,
    compile::Expr,
    plan::{self, JoinKind, Plan, Scalar},
    CompileOptions, ElementShape, ScalarType, Value,
};

use super::super::{field_equals, orders_shape, scan, shop};

/// A sub-plan used by two parents appears once in the registry, and is
/// referenced twice.
pub fn test() {
    let root_schema = shop();
    let mut plan = Plan::new();
    let orders = scan(&mut plan, &[], "orders", orders_shape());
    let pens = plan.insert(plan::Filter {
        input: orders,
        predicate: field_equals(1, Value::str("pen")),
    });
    let ids = plan.insert(plan::Project {
        input: pens,
        exprs: vec![Scalar::column(0)],
        shape: ElementShape::Scalar(ScalarType::Int),
    });
    let quantities = plan.insert(plan::Project {
        input: pens,
        exprs: vec![Scalar::column(2)],
        shape: ElementShape::Scalar(ScalarType::Int),
    });
    let root = plan.insert(plan::Join {
        left: ids,
        right: quantities,
        kind: JoinKind::Cross,
    });

    let program = compile(&plan, root, &root_schema, &CompileOptions::default()).unwrap();

    let filters = program
        .registry()
        .iter()
        .filter(|(_, expr)| matches!(expr, Expr::Filter { .. }))
        .map(|(name, _)| name)
        .collect::<Vec<_>>();
    assert_eq!(filters.len(), 1);
    let shared = filters[0];

    let uses = program
        .registry()
        .values()
        .chain(std::iter::once(&program.body().expr))
        .flat_map(|expr| expr.vars())
        .filter(|name| *name == shared)
        .count();
    assert_eq!(uses, 2);

    // scan, then the shared filter
    assert_eq!(program.registry().len(), 2);

    let pairs = program
        .collect(&root_schema)
        .unwrap()
        .into_iter()
        .map(|row| (row.values()[0].clone(), row.values()[1].clone()))
        .collect::<Vec<_>>();
    assert_eq!(
        pairs,
        vec![
            (Value::Int(1), Value::Int(2)),
            (Value::Int(1), Value::Int(5)),
            (Value::Int(3), Value::Int(2)),
            (Value::Int(3), Value::Int(5)),
        ]
    );
}
