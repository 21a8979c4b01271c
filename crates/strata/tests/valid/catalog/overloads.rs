use strata::{MapSchema, MutableSchema, Resolution, Row, Schema, Table, TableFunction, Value};

use super::super::{first_fields, range};

pub fn test() {
    let mut root = MapSchema::root();
    root.add_table_function("range", range(1));
    root.add_table_function("range", range(2));
    root.add_table_function("range", range(1));

    let listed = root.table_functions("range");
    assert_eq!(listed.len(), 3);
    assert_eq!(listed[0].parameters().len(), 1);
    assert_eq!(listed[1].parameters().len(), 2);

    root.add_table_function("range", range(2));
    let listed = root.table_functions("range");
    assert_eq!(listed.len(), 4);
    assert_eq!(
        listed.iter().map(|f| f.parameters().len()).collect::<Vec<_>>(),
        vec![1, 2, 1, 2]
    );
    assert_eq!(root.function_names(), vec!["range"]);

    // the first accepting overload, in insertion order, is applied
    let Resolution::Function { function, table } =
        root.resolve_function("range", &[Value::Int(1), Value::Int(3)]).unwrap()
    else {
        panic!("range(1, 3) resolves")
    };
    assert_eq!(function.parameters().len(), 2);
    let rows = table.rows().unwrap().collect::<Vec<Row>>();
    assert_eq!(first_fields(&rows), vec![Value::Int(1), Value::Int(2)]);

    // no zero parameter overload, so `range` alone is not a table
    assert!(!root.resolve_table("range").unwrap().is_found());
    assert!(!root
        .resolve_function("range", &[Value::str("3")])
        .unwrap()
        .is_found());

}
