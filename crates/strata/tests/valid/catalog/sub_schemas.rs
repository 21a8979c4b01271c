use strata::{MapSchema, MutableSchema, Schema, Table};

use super::super::{at, ids, range, shop};

pub fn test() {
    let mut root = shop();
    {
        let hr = MapSchema::create(&mut root, "hr");
        hr.add_rows("people", ids(), []);
        hr.add_table_function("range", range(1));
        MapSchema::create(hr, "archive").add_rows("people", ids(), []);
    }

    assert_eq!(root.sub_schema_names(), vec!["hr", "sales"]);
    assert_eq!(root.table_names(), vec!["orders"]);
    assert!(root.function_names().is_empty());

    let hr = at(&root, &["hr"]);
    let sales = at(&root, &["sales"]);
    assert_eq!(hr.table_names(), vec!["people"]);
    assert_eq!(sales.table_names(), vec!["returns"]);
    assert_eq!(sales.table_functions("range").len(), 2);
    assert_eq!(hr.table_functions("range").len(), 1);
    assert!(!sales.resolve_table("people").unwrap().is_found());
    assert!(hr.resolve_sub_schema("sales").is_none());

    // each entry navigates back to itself from the root
    let archived = at(&root, &["hr", "archive"]).table("people").unwrap();
    assert_eq!(
        archived.navigation().to_string(),
        format!(
            "root.hr.<{0}>.archive.<{0}>.people",
            std::any::type_name::<MapSchema>()
        )
    );
    assert!(archived.navigation().resolve_table(&root).is_ok());

    // replacing a sub-schema drops the old one
    root.add_schema("hr", Box::new(MapSchema::new(root.sub_schema_navigation("hr", None))));
    assert!(at(&root, &["hr"]).table_names().is_empty());
}
