use tcode_helper_core::catalog::Catalog;
use tcode_helper_core::catalog_import::{missing_from, parse_list, read_list, ImportError};
use tcode_helper_core::model::Entry;

const LIST: &str = "\
# Basis

- `SE16` Data Browser: display table
-- older codes
- `/nva01` Create Sales Order
* SM30 not a list item
-   `ME21N`Create Purchase Order
";

#[test]
fn parses_list_lines_and_skips_noise() {
    let parsed = parse_list(LIST);

    let codes: Vec<&str> = parsed.entries.iter().map(|e| e.code.as_str()).collect();
    assert_eq!(codes, vec!["VA01", "ME21N", "SE16"]);

    let se16 = &parsed.entries[2];
    assert_eq!(se16.descr, "Data Browser display table");
    assert_eq!(se16.keywords, se16.descr);
}

#[test]
fn reports_unparsed_lines_with_numbers() {
    let parsed = parse_list(LIST);

    assert_eq!(parsed.rejected.len(), 1);
    assert_eq!(parsed.rejected[0].line_number, 6);
    assert_eq!(parsed.rejected[0].text, "* SM30 not a list item");
}

#[test]
fn entries_follow_the_code_as_written() {
    let parsed = parse_list("- `se16` Data Browser\n- `VA01` Create Sales Order\n");

    let codes: Vec<&str> = parsed.entries.iter().map(|e| e.code.as_str()).collect();
    assert_eq!(codes, vec!["VA01", "SE16"]);
}

#[test]
fn missing_codes_compare_verbatim() {
    let catalog = Catalog::from_entries(vec![
        Entry::new("SE16", "Data Browser", "display contents of table"),
        Entry::new("va01", "Create Sales Order", "create sales order"),
    ])
    .unwrap();
    let parsed = parse_list(LIST);

    let missing = missing_from(&parsed, &catalog);

    let codes: Vec<&str> = missing.iter().map(|e| e.code.as_str()).collect();
    assert_eq!(codes, vec!["VA01", "ME21N"]);
}

#[test]
fn missing_list_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = read_list(&dir.path().join("t-codes.md"));
    assert!(matches!(result, Err(ImportError::Io { .. })));
}
