use super::*;

const SAMPLE_SKOS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:skos="http://www.w3.org/2004/02/skos/core#"
         xmlns:xas="https://example.org/xas#">
  <skos:ConceptScheme rdf:about="https://example.org/xas#scheme"/>
  <skos:Concept rdf:about="https://example.org/xas#element">
    <skos:prefLabel xml:lang="en">element</skos:prefLabel>
    <skos:narrower rdf:resource="https://example.org/xas#elementSymbol"/>
    <skos:inScheme rdf:resource="https://example.org/xas#scheme"/>
  </skos:Concept>
  <skos:Concept rdf:about="https://example.org/xas#elementSymbol">
    <skos:prefLabel xml:lang="de">Elementsymbol</skos:prefLabel>
    <skos:prefLabel xml:lang="en">element symbol</skos:prefLabel>
    <skos:altLabel>absorber</skos:altLabel>
    <skos:definition>Atomic symbol of the absorbing element.</skos:definition>
    <skos:notation>element.symbol</skos:notation>
    <skos:broader rdf:resource="https://example.org/xas#element"/>
    <skos:related rdf:resource="https://schema.org/name"/>
  </skos:Concept>
  <rdf:Description rdf:about="https://example.org/xas#edge">
    <rdf:type rdf:resource="http://www.w3.org/2004/02/skos/core#Concept"/>
    <skos:prefLabel>absorption edge</skos:prefLabel>
  </rdf:Description>
  <rdf:Description rdf:about="https://example.org/xas#notAConcept">
    <skos:prefLabel>ignored</skos:prefLabel>
  </rdf:Description>
</rdf:RDF>"#;

fn load(xml: &str) -> Result<Glossary, GlossaryError> {
    Glossary::from_reader(std::io::Cursor::new(xml), &NamespaceMap::with_defaults())
}

#[test]
fn test_skos_parsing() {
    let glossary = load(SAMPLE_SKOS).unwrap();

    assert_eq!(glossary.len(), 3);
    assert_eq!(glossary.schemes(), &["https://example.org/xas#scheme".to_string()]);

    let symbol = glossary.get("xas:elementSymbol").unwrap();
    assert_eq!(symbol.pref_label, "element symbol");
    assert_eq!(symbol.alt_labels, vec!["absorber".to_string()]);
    assert_eq!(
        symbol.definition.as_deref(),
        Some("Atomic symbol of the absorbing element.")
    );
    assert!(symbol.broader.contains("xas:element"));
    assert!(symbol.related.contains("schema:name"));
    assert_eq!(symbol.vocabulary.as_deref(), Some("xas"));

    let element = glossary.get("xas:element").unwrap();
    assert!(element.narrower.contains("xas:elementSymbol"));
    assert_eq!(element.vocabulary.as_deref(), Some("xas:scheme"));
}

#[test]
fn test_typed_description_is_concept() {
    let glossary = load(SAMPLE_SKOS).unwrap();
    assert!(glossary.contains("xas:edge"));
    assert!(!glossary.contains("xas:notAConcept"));
}

#[test]
fn test_find_by_notation() {
    let glossary = load(SAMPLE_SKOS).unwrap();
    let concept = glossary.resolve("element.symbol").unwrap();
    assert_eq!(concept.identifier, "xas:elementSymbol");
}

#[test]
fn test_duplicate_identifier_rejected() {
    let xml = r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:skos="http://www.w3.org/2004/02/skos/core#">
  <skos:Concept rdf:about="https://example.org/xas#edge"/>
  <skos:Concept rdf:about="https://example.org/xas#edge"/>
  <skos:Concept rdf:about="https://example.org/xas#energy"/>
</rdf:RDF>"#;

    match load(xml) {
        Err(GlossaryError::DuplicateIdentifier(ids)) => {
            assert_eq!(ids, vec!["https://example.org/xas#edge".to_string()]);
        }
        other => panic!("expected duplicate identifier error, got {:?}", other),
    }
}

#[test]
fn test_malformed_xml_is_parse_error() {
    let xml = r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:skos="http://www.w3.org/2004/02/skos/core#">
  <skos:Concept rdf:about="https://example.org/xas#edge">
    <skos:prefLabel>edge</skos:definition>
  </skos:Concept>
</rdf:RDF>"#;

    assert!(matches!(load(xml), Err(GlossaryError::ParseError { .. })));
}

#[test]
fn test_truncated_document_is_parse_error() {
    let xml = r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:skos="http://www.w3.org/2004/02/skos/core#">
  <skos:Concept rdf:about="https://example.org/xas#edge">"#;

    assert!(matches!(load(xml), Err(GlossaryError::ParseError { .. })));
}

#[test]
fn test_wrong_root_is_parse_error() {
    let xml = r#"<vocabulary><term id="edge"/></vocabulary>"#;
    assert!(matches!(load(xml), Err(GlossaryError::ParseError { .. })));
}

#[test]
fn test_concept_without_about_is_parse_error() {
    let xml = r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:skos="http://www.w3.org/2004/02/skos/core#">
  <skos:Concept><skos:prefLabel>anonymous</skos:prefLabel></skos:Concept>
</rdf:RDF>"#;

    assert!(matches!(load(xml), Err(GlossaryError::ParseError { .. })));
}

#[test]
fn test_xml_base_resolves_relative_ids() {
    let xml = r##"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:skos="http://www.w3.org/2004/02/skos/core#"
         xmlns:xas="https://example.org/xas#"
         xml:base="https://example.org/xas">
  <skos:Concept rdf:ID="energy"/>
  <skos:Concept rdf:about="#angle"/>
</rdf:RDF>"##;

    let glossary = load(xml).unwrap();
    assert!(glossary.contains("xas:energy"));
    assert!(glossary.contains("xas:angle"));
}

#[test]
fn test_nested_namespace_declarations_stay_local() {
    let xml = r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:skos="http://www.w3.org/2004/02/skos/core#"
         xmlns:xas="https://example.org/xas#">
  <skos:Concept rdf:about="https://example.org/xas#absorptionEdge"/>
  <skos:Concept xmlns:xas="https://other.org/v#" rdf:about="https://other.org/v#thing">
    <skos:prefLabel>thing</skos:prefLabel>
    <skos:related rdf:resource="https://example.org/xas#elementSymbol"/>
  </skos:Concept>
  <skos:Concept rdf:about="https://example.org/xas#elementSymbol">
    <skos:broader xmlns:skos="https://other.org/skos#" rdf:resource="https://example.org/xas#absorptionEdge"/>
  </skos:Concept>
</rdf:RDF>"#;

    let glossary = load(xml).unwrap();
    assert_eq!(glossary.namespaces().get("xas"), Some("https://example.org/xas#"));
    assert!(glossary.contains("xas:absorptionEdge"));
    assert!(glossary.contains("xas:elementSymbol"));
    assert!(glossary.contains("https://other.org/v#thing"));
    assert!(!glossary.contains("xas:thing"));

    // skos:broader under a rebound skos prefix is not a SKOS property
    let symbol = glossary.get("xas:elementSymbol").unwrap();
    assert_eq!(symbol.relations().count(), 0);
}

#[test]
fn test_base_namespaces_take_precedence() {
    let base = NamespaceMap::with_defaults().with("x", "https://example.org/xas#");
    let glossary = Glossary::from_reader(std::io::Cursor::new(SAMPLE_SKOS), &base).unwrap();

    assert!(glossary.contains("x:elementSymbol"));
    assert_eq!(glossary.namespaces().get("xas"), Some("https://example.org/xas#"));
}

#[test]
fn test_dangling_relations() {
    let records = vec![
        ConceptRecord::new("xas:edge", "https://example.org/xas#edge")
            .with_relation(RelationKind::Broader, "xas:missing")
            .with_relation(RelationKind::Related, "schema:name"),
        ConceptRecord::new("xas:energy", "https://example.org/xas#energy")
            .with_relation(RelationKind::Related, "xas:edge"),
    ];
    let glossary = Glossary::from_records(records, NamespaceMap::with_defaults()).unwrap();

    let dangling = glossary.find_dangling_relations(&ExternalVocabularies::new());
    assert_eq!(
        dangling,
        vec![DanglingRelation {
            concept: "xas:edge".to_string(),
            relation: RelationKind::Broader,
            target: "xas:missing".to_string(),
        }]
    );
}
