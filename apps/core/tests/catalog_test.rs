use std::io::Write;

use tcode_helper_core::catalog::{Catalog, CatalogError};
use tcode_helper_core::model::Entry;

#[test]
fn loads_catalog_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"[
            {{"code": "SE16", "descr": "Data Browser", "keywords": "display contents of table"}},
            {{"code": "SE11", "descr": "ABAP Dictionary", "keywords": "dictionary"}}
        ]"#
    )
    .unwrap();

    let catalog = Catalog::load(file.path()).unwrap();

    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.entries()[0].code, "SE11");
    assert_eq!(catalog.find("se16").unwrap().descr, "Data Browser");
}

#[test]
fn entries_are_sorted_by_code_regardless_of_input_order() {
    let catalog = Catalog::from_entries(vec![
        Entry::new("VA01", "", "a"),
        Entry::new("me21n", "", "b"),
        Entry::new("SE16", "", "c"),
        Entry::new("AL11", "", "d"),
    ])
    .unwrap();

    let codes: Vec<&str> = catalog.entries().iter().map(|e| e.code.as_str()).collect();
    assert_eq!(codes, vec!["AL11", "me21n", "SE16", "VA01"]);
}

#[test]
fn duplicate_codes_are_rejected_case_insensitively() {
    let result = Catalog::from_entries(vec![
        Entry::new("SE16", "Data Browser", "table"),
        Entry::new("se16", "Other", "other"),
    ]);

    match result {
        Err(CatalogError::DuplicateCode { code }) => assert_eq!(code, "se16"),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = Catalog::load(&dir.path().join("tcodes.json"));
    assert!(matches!(result, Err(CatalogError::Io { .. })));
}

#[test]
fn malformed_json_is_a_parse_error() {
    assert!(matches!(
        Catalog::from_json("[{\"code\": \"SE16\""),
        Err(CatalogError::Parse(_))
    ));
    assert!(matches!(
        Catalog::from_json("{\"code\": \"SE16\"}"),
        Err(CatalogError::Parse(_))
    ));
    assert!(matches!(
        Catalog::from_json(r#"[{"code": 16, "descr": "x", "keywords": "y"}]"#),
        Err(CatalogError::Parse(_))
    ));
}

#[test]
fn missing_field_is_reported() {
    let result = Catalog::from_json(r#"[{"code": "SE16", "keywords": "table"}]"#);
    assert!(matches!(
        result,
        Err(CatalogError::MissingField {
            index: 0,
            field: "descr"
        })
    ));
}

#[test]
fn empty_catalog_is_valid() {
    let catalog = Catalog::from_json("[]").unwrap();
    assert!(catalog.is_empty());
    assert!(catalog.find("SE16").is_none());
}
