use strata::{
    compile::{Event, Implementor},
    plan::{self, JoinKind, Plan},
    CompileOptions, ElementShape, ScalarType, Value,
};

use super::super::{field_equals, ids, orders_shape, scan, shop};

/// Every operator is implemented after all of its children, which are visited
/// in declared order.
pub fn test() {
    let root_schema = shop();
    let options = CompileOptions::default();
    let mut plan = Plan::new();

    let orders = scan(&mut plan, &[], "orders", orders_shape());
    let pens = plan.insert(plan::Filter {
        input: orders,
        predicate: field_equals(1, Value::str("pen")),
    });
    let returns = scan(&mut plan, &["sales"], "returns", ids());
    let range = plan.insert(plan::Call {
        schema: vec![String::from("sales")],
        function: String::from("range"),
        args: vec![Value::Int(5)],
        shape: ElementShape::Scalar(ScalarType::Int),
    });
    let union = plan.insert(plan::Union {
        inputs: vec![returns, returns, range],
    });
    let root = plan.insert(plan::Join {
        left: pens,
        right: union,
        kind: JoinKind::Cross,
    });

    let mut implementor = Implementor::new(&plan, &root_schema, &options);
    implementor.implement_root(root).unwrap();
    let events = implementor.events();

    let position = |event: Event| {
        events
            .iter()
            .position(|e| *e == event)
            .expect("event occurs")
    };
    let implemented = |key: plan::Key<plan::Operator>| position(Event::Implemented(key.arr_idx()));

    for parent in [pens, union, root] {
        let children = plan.get_operator(parent).children();
        let mut last_visit = None;
        for (ordinal, child) in children.iter().enumerate() {
            let visit = position(Event::Visit {
                parent: parent.arr_idx(),
                ordinal,
                child: child.arr_idx(),
            });
            assert!(last_visit < Some(visit), "siblings are visited in order");
            let first_visit = events
                .iter()
                .position(|e| matches!(e, Event::Visit { child: c, .. } if *c == child.arr_idx()))
                .expect("child is visited");
            assert!(first_visit < implemented(*child), "children are implemented once visited");
            assert!(implemented(*child) < implemented(parent));
            last_visit = Some(visit);
        }
    }

    // the shared scan is implemented once, and visited by each edge
    let implementations = events
        .iter()
        .filter(|e| **e == Event::Implemented(returns.arr_idx()))
        .count();
    assert_eq!(implementations, 1);
    let visits = events
        .iter()
        .filter(|e| matches!(e, Event::Visit { child, .. } if *child == returns.arr_idx()))
        .count();
    assert_eq!(visits, 2);
    assert_eq!(events.last(), Some(&Event::Implemented(root.arr_idx())));
}
