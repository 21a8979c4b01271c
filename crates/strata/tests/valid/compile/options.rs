use strata::{compile, CompileOptions};

use super::super::{orders_shape, scan, shop};

pub fn test() {
    let options: CompileOptions = serde_json::from_str(
        r#"{
            "bind_intermediates": true,
            "pipeline_name": "all_orders"
        }"#,
    )
    .unwrap();
    assert!(options.bind_intermediates);
    assert!(options.debug_file.is_none());

    assert!(serde_json::from_str::<CompileOptions>(r#"{ "bind": true }"#).is_err());

    let root = shop();
    let mut plan = strata::plan::Plan::new();
    let orders = scan(&mut plan, &[], "orders", orders_shape());
    let program = compile(&plan, orders, &root, &options).unwrap();
    assert!(program.pretty().unwrap().contains("pub fn all_orders("));
    assert_eq!(program.collect(&root).unwrap().len(), 4);
}
