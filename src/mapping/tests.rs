use super::*;
use proptest::prelude::*;
use std::path::Path;

const SAMPLE_CSV: &str = "Source Format,Source Field,Target Property,Required,Transformation Note
XDI,element.symbol,xas:elementSymbol,yes,
XDI,element.edge,xas:absorptionEdge,yes,K/L1/L2/L3
XDI,mono.d_spacing,xas:dSpacing,,Angstrom
NXxas,/entry/element,xas:elementSymbol,,\"path, not keyword\"
";

fn load(text: &str) -> MappingTable {
    MappingTable::from_reader(text.as_bytes(), b',').unwrap()
}

#[test]
fn test_mapping_parsing() {
    let table = load(SAMPLE_CSV);

    assert_eq!(table.len(), 4);
    assert!(table.issues().is_empty());

    let first = &table.records()[0];
    assert_eq!(first.source_format.as_deref(), Some("XDI"));
    assert_eq!(first.source_field, "element.symbol");
    assert_eq!(first.target_property, "xas:elementSymbol");
    assert!(first.required);
    assert_eq!(first.note, None);
    assert_eq!(first.row, 2);

    assert!(!table.records()[2].required);
    assert_eq!(table.records()[3].note.as_deref(), Some("path, not keyword"));
}

#[test]
fn test_order_is_preserved() {
    let table = load(SAMPLE_CSV);
    let fields: Vec<&str> = table.iter().map(|r| r.source_field.as_str()).collect();
    assert_eq!(
        fields,
        vec!["element.symbol", "element.edge", "mono.d_spacing", "/entry/element"]
    );
}

#[test]
fn test_tsv_with_aliases() {
    let tsv = "field\tproperty\tnotes\nelement.symbol\txas:elementSymbol\t\nscan.start_time\tschema:startDate\tISO 8601\n";
    let table = MappingTable::from_reader(tsv.as_bytes(), b'\t').unwrap();

    assert_eq!(table.len(), 2);
    assert_eq!(table.records()[1].note.as_deref(), Some("ISO 8601"));
    assert!(table.iter().all(|r| !r.required && r.source_format.is_none()));
}

#[test]
fn test_missing_column() {
    let csv = "source field,note\nelement.symbol,\n";
    match MappingTable::from_reader(csv.as_bytes(), b',') {
        Err(MappingError::MissingColumn(column)) => assert_eq!(column, "target property"),
        other => panic!("expected missing column error, got {:?}", other),
    }
}

#[test]
fn test_empty_field_skips_row() {
    let csv = "source field,target property\nelement.symbol,xas:elementSymbol\n,xas:absorptionEdge\nmono.name,\n";
    let table = load(csv);

    assert_eq!(table.len(), 1);
    assert_eq!(
        table.issues(),
        &[
            RowIssue::EmptyField {
                row: 3,
                column: "source field".to_string()
            },
            RowIssue::EmptyField {
                row: 4,
                column: "target property".to_string()
            },
        ]
    );
}

#[test]
fn test_duplicate_source_field_within_format() {
    let csv = "format,source field,target property
XDI,element.symbol,xas:elementSymbol
NXxas,element.symbol,xas:elementSymbol
xdi,element.symbol,schema:name
";
    let table = load(csv);

    assert_eq!(table.len(), 2);
    assert_eq!(
        table.issues(),
        &[RowIssue::DuplicateSourceField {
            row: 4,
            first_row: 2,
            source_field: "element.symbol".to_string()
        }]
    );
}

#[test]
fn test_duplicate_source_field_ignores_case() {
    let csv = "source field,target property
Element.symbol,xas:elementSymbol
element.symbol,schema:name
";
    let table = load(csv);

    assert_eq!(table.len(), 1);
    assert_eq!(table.records()[0].target_property, "xas:elementSymbol");
    assert_eq!(
        table.issues(),
        &[RowIssue::DuplicateSourceField {
            row: 3,
            first_row: 2,
            source_field: "element.symbol".to_string()
        }]
    );
}

#[test]
fn test_blank_rows_are_ignored() {
    let csv = "source field,target property\nelement.symbol,xas:elementSymbol\n,\n";
    assert_eq!(load(csv).len(), 1);
}

#[test]
fn test_required_flag() {
    for value in ["yes", "Y", "TRUE", "1", "x", "Required", " mandatory "] {
        assert!(parse_required_flag(value), "{} should be truthy", value);
    }
    for value in ["", "no", "optional", "0"] {
        assert!(!parse_required_flag(value), "{} should be falsy", value);
    }
}

#[test]
fn test_delimiter_for_path() {
    assert_eq!(delimiter_for_path(Path::new("map.tsv")), b'\t');
    assert_eq!(delimiter_for_path(Path::new("map.TAB")), b'\t');
    assert_eq!(delimiter_for_path(Path::new("map.csv")), b',');
    assert_eq!(delimiter_for_path(Path::new("map")), b',');
}

#[test]
fn test_for_format() {
    let table = load(SAMPLE_CSV);
    assert_eq!(table.for_format("xdi").count(), 3);
    assert_eq!(table.for_format("NXxas").count(), 1);
}

fn record_strategy() -> impl Strategy<Value = MappingRecord> {
    (
        proptest::option::of(prop_oneof![Just("XDI".to_string()), Just("NXxas".to_string())]),
        "[a-z][a-z_.]{0,15}",
        "[a-z]{1,6}:[A-Za-z]{1,12}",
        proptest::option::of("[ -~]{0,30}"),
        any::<bool>(),
    )
        .prop_map(|(source_format, field, target, note, required)| MappingRecord {
            source_format,
            source_field: field,
            target_property: target,
            note: note
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
            required,
            row: 0,
        })
}

proptest! {
    #[test]
    fn prop_write_then_reload_is_identity(
        records in proptest::collection::vec(record_strategy(), 0..20),
        tab in any::<bool>(),
    ) {
        // Source fields are unique per table so no row is dropped as a duplicate.
        let records: Vec<MappingRecord> = records
            .into_iter()
            .enumerate()
            .map(|(i, mut r)| {
                r.source_field = format!("{}{}", r.source_field, i);
                r
            })
            .collect();

        let delimiter = if tab { b'\t' } else { b',' };
        let table = MappingTable::from_records(records.clone()).with_delimiter(delimiter);

        let mut buffer = Vec::new();
        table.write_to(&mut buffer).unwrap();
        let reloaded = MappingTable::from_reader(buffer.as_slice(), delimiter).unwrap();

        prop_assert_eq!(reloaded.records(), records.as_slice());
        prop_assert!(reloaded.issues().is_empty());
    }

    #[test]
    fn prop_record_count_matches_rows(n in 0usize..50) {
        let mut csv = String::from("source field,target property\n");
        for i in 0..n {
            csv.push_str(&format!("field{},xas:p{}\n", i, i));
        }
        prop_assert_eq!(load(&csv).len(), n);
    }
}
