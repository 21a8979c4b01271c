use strata::{
    compile,
    plan::{self, JoinKind, Scalar},
    CompileOptions, ElementShape, MapSchema, Row, ScalarType, Value,
};

use super::super::{int, scan};

pub fn test() {
    let ints = ElementShape::Scalar(ScalarType::Int);
    let mut root = MapSchema::root();
    root.add_rows("a", ints.clone(), [1, 2].map(int));
    root.add_rows("b", ints.clone(), [2, 3].map(int));

    let mut plan = plan::Plan::new();
    let a = scan(&mut plan, &[], "a", ints.clone());
    let b = scan(&mut plan, &[], "b", ints.clone());
    let joined = plan.insert(plan::Join {
        left: a,
        right: b,
        kind: JoinKind::Equi {
            left: vec![Scalar::column(0)],
            right: vec![Scalar::column(0)],
        },
    });

    let program = compile(&plan, joined, &root, &CompileOptions::default()).unwrap();
    assert_eq!(program.shape().width(), 2);
    assert_eq!(
        program.collect(&root).unwrap(),
        vec![Row::tuple([Value::Int(2), Value::Int(2)])]
    );

    // the same join as a predicate over the joined row
    let mut plan = plan::Plan::new();
    let a = scan(&mut plan, &[], "a", ints.clone());
    let b = scan(&mut plan, &[], "b", ints);
    let joined = plan.insert(plan::Join {
        left: a,
        right: b,
        kind: JoinKind::Predicate(Scalar::column(0).equals(&Scalar::column(1))),
    });
    let program = compile(&plan, joined, &root, &CompileOptions::default()).unwrap();
    assert_eq!(
        program.collect(&root).unwrap(),
        vec![Row::tuple([Value::Int(2), Value::Int(2)])]
    );
}
