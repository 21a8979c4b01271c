use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use strata::{
    ElementShape, FnTableFunction, ListTable, MapSchema, MutableSchema, Navigation, Resolution,
    Schema, Table,
};

use super::super::{int, ids};

pub fn test() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();

    let mut root = MapSchema::root();
    root.add_rows("x", ids(), [strata::Row::tuple([strata::Value::Int(1)])]);
    root.add_table_function(
        "x",
        Arc::new(FnTableFunction::new(
            Vec::new(),
            ElementShape::Scalar(strata::ScalarType::Int),
            move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(Arc::new(ListTable::new(
                    ElementShape::Scalar(strata::ScalarType::Int),
                    Navigation::root().table("x"),
                    [int(2)],
                )))
            },
        )),
    );

    for _ in 0..3 {
        match root.resolve_table("x").unwrap() {
            Resolution::Table(table) => assert_eq!(table.shape(), &ids()),
            _ => panic!("the table is found before the function"),
        }
    }
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}
