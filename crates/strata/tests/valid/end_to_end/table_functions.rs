use strata::{
    compile,
    plan::{self, Scalar},
    CompileError, CompileOptions, ElementShape, FnTableFunction, ListTable, MutableSchema,
    Navigation, ScalarType, Value,
};

use super::super::{first_fields, int, shop};

fn call(plan: &mut plan::Plan, function: &str, args: Vec<Value>) -> plan::Key<plan::Operator> {
    plan.insert(plan::Call {
        schema: vec![String::from("sales")],
        function: function.to_owned(),
        args,
        shape: ElementShape::Scalar(ScalarType::Int),
    })
}

pub fn test() {
    let mut root = shop();
    let options = CompileOptions::default();

    // overloads are chosen by arguments
    let mut plan = plan::Plan::new();
    let upto = call(&mut plan, "range", vec![Value::Int(3)]);
    let between = call(&mut plan, "range", vec![Value::Int(5), Value::Int(7)]);
    let both = plan.insert(plan::Union {
        inputs: vec![upto, between],
    });
    let program = compile(&plan, both, &root, &options).unwrap();
    assert_eq!(
        first_fields(&program.collect(&root).unwrap()),
        [0, 1, 2, 5, 6].map(Value::Int).to_vec()
    );

    let mut plan = plan::Plan::new();
    let bad = call(&mut plan, "range", vec![Value::str("three")]);
    assert!(matches!(
        compile(&plan, bad, &root, &options),
        Err(CompileError::NoMatchingOverload { arity: 1, .. })
    ));

    // a zero parameter function can be scanned like a table
    root.sub_map_mut("sales").unwrap().add_table_function(
        "digits",
        std::sync::Arc::new(FnTableFunction::new(
            Vec::new(),
            ElementShape::Scalar(ScalarType::Int),
            |_| {
                Ok(std::sync::Arc::new(ListTable::new(
                    ElementShape::Scalar(ScalarType::Int),
                    Navigation::root().sub_schema("sales").table("digits"),
                    (0..10).map(int),
                )))
            },
        )),
    );
    let mut plan = plan::Plan::new();
    let digits = super::super::scan(&mut plan, &["sales"], "digits", ElementShape::Scalar(ScalarType::Int));
    let odd = plan.insert(plan::Filter {
        input: digits,
        predicate: Scalar::new("odd", |row| {
            Value::Bool(row.values()[0].as_int().is_some_and(|i| i % 2 == 1))
        }),
    });
    let program = compile(&plan, odd, &root, &options).unwrap();
    assert_eq!(
        first_fields(&program.collect(&root).unwrap()),
        [1, 3, 5, 7, 9].map(Value::Int).to_vec()
    );
}
