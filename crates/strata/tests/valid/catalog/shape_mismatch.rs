use strata::{
    compile, plan::Plan, CatalogError, CompileError, CompileOptions, ElementShape, ScalarType,
    Schema,
};

use super::super::{orders_shape, scan, shop};

pub fn test() {
    let root = shop();

    // names differ, types line up
    let renamed = ElementShape::tuple([
        ("order_id", ScalarType::Int),
        ("name", ScalarType::Str),
        ("n", ScalarType::Any),
    ]);
    assert!(root.resolve_table_typed("orders", &renamed).is_ok());

    let swapped = ElementShape::tuple([
        ("item", ScalarType::Str),
        ("id", ScalarType::Int),
        ("quantity", ScalarType::Int),
    ]);
    match root.resolve_table_typed("orders", &swapped) {
        Err(CatalogError::ShapeMismatch {
            name,
            expected,
            found,
        }) => {
            assert_eq!(name, "orders");
            assert_eq!(expected, swapped);
            assert_eq!(found, orders_shape());
        }
        _ => panic!("swapped columns do not match"),
    }

    let mut plan = Plan::new();
    let root_op = scan(&mut plan, &[], "orders", swapped);
    let error = compile(&plan, root_op, &root, &CompileOptions::default())
        .err()
        .expect("compiling a scan of the wrong shape fails");
    assert!(matches!(
        error,
        CompileError::Catalog(CatalogError::ShapeMismatch { .. })
    ));
    assert!(error.to_string().contains("orders"));
}
