//! Pull-based SKOS RDF/XML reader using quick-xml
//!
//! Only the flat "one node element per concept" layout that vocabulary
//! editors export is understood. Nested node elements inside property
//! elements are skipped.

use std::io::BufRead;

use log::debug;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::namespace::{is_iri, split_curie, NamespaceMap, RDF_NS, SKOS_NS};

use super::concept::{ConceptRecord, RelationKind};
use super::GlossaryError;

/// A literal with an optional `xml:lang` tag
#[derive(Debug, Clone)]
pub(crate) struct LangString {
    pub lang: Option<String>,
    pub text: String,
}

/// Concept description collected before identifiers are assigned
#[derive(Debug, Default)]
pub(crate) struct ConceptDraft {
    pub iri: String,
    pub typed_concept: bool,
    pub pref_labels: Vec<LangString>,
    pub alt_labels: Vec<String>,
    pub definitions: Vec<LangString>,
    pub notations: Vec<String>,
    pub relations: Vec<(RelationKind, String)>,
    pub in_scheme: Option<String>,
}

impl ConceptDraft {
    /// Assign the compacted identifier and pick language-preferred literals
    pub(crate) fn into_record(self, namespaces: &NamespaceMap) -> ConceptRecord {
        let compact = |iri: &str| namespaces.compact(iri).unwrap_or_else(|| iri.to_string());

        let identifier = compact(&self.iri);
        let vocabulary = match &self.in_scheme {
            Some(scheme) => Some(compact(scheme)),
            None => split_curie(&identifier).map(|(prefix, _)| prefix.to_string()),
        };

        let mut record = ConceptRecord {
            pref_label: pick_preferred(&self.pref_labels).unwrap_or_default(),
            definition: pick_preferred(&self.definitions),
            alt_labels: self.alt_labels,
            notations: self.notations,
            vocabulary,
            iri: self.iri,
            identifier,
            ..Default::default()
        };
        for (kind, target) in &self.relations {
            record.relations_mut(*kind).insert(compact(target));
        }
        record
    }
}

/// Untagged or English literals win over other languages.
fn pick_preferred(values: &[LangString]) -> Option<String> {
    values
        .iter()
        .find(|v| v.lang.as_deref().map_or(true, |l| l == "en" || l.starts_with("en-")))
        .or_else(|| values.first())
        .map(|v| v.text.clone())
}

/// Output of the XML pass
#[derive(Debug, Default)]
pub(crate) struct ParsedVocabulary {
    pub drafts: Vec<ConceptDraft>,
    pub namespaces: NamespaceMap,
    pub schemes: Vec<String>,
}

#[derive(Debug, Clone, Copy)]
enum TextProperty {
    PrefLabel,
    AltLabel,
    Definition,
    Notation,
}

#[derive(Debug, Clone, Copy)]
enum PropertyKind {
    Text(TextProperty),
    Relation(RelationKind),
    InScheme,
    Other,
}

/// Parse SKOS RDF/XML from a reader
pub(crate) fn parse_rdf_xml<R: BufRead>(input: R) -> Result<ParsedVocabulary, GlossaryError> {
    let mut reader = Reader::from_reader(input);
    reader.config_mut().trim_text(true);

    let mut parser = SkosParser::default();
    let mut buf = Vec::new();

    loop {
        let position = reader.buffer_position() as u64;
        let event = match reader.read_event_into(&mut buf) {
            Ok(event) => event,
            Err(e) => {
                return Err(GlossaryError::parse(
                    reader.buffer_position() as u64,
                    e.to_string(),
                ))
            }
        };

        match event {
            Event::Start(ref e) => parser.start(e, false, position)?,
            Event::Empty(ref e) => parser.start(e, true, position)?,
            Event::End(_) => parser.end(position)?,
            Event::Text(ref t) => {
                let text = t
                    .unescape()
                    .map_err(|e| GlossaryError::parse(position, e.to_string()))?;
                parser.text(&text);
            }
            Event::CData(ref c) => parser.text(&String::from_utf8_lossy(c)),
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    parser.finish(reader.buffer_position() as u64)
}

/// Bindings that an element's own `xmlns` attributes replaced
type SavedScope = Option<(NamespaceMap, Option<String>)>;

#[derive(Default)]
struct SkosParser {
    parsed: ParsedVocabulary,
    scope: NamespaceMap,
    default_ns: Option<String>,
    saved_scopes: Vec<SavedScope>,
    base: Option<String>,
    depth: usize,
    seen_root: bool,
    current: Option<ConceptDraft>,
    text_property: Option<(TextProperty, Option<String>)>,
    text: String,
}

impl SkosParser {
    fn start(&mut self, e: &BytesStart, empty: bool, position: u64) -> Result<(), GlossaryError> {
        let saved = self.enter_scope(e, position)?;
        self.start_element(e, empty, position)?;

        if empty {
            self.leave_scope(saved);
        } else {
            self.saved_scopes.push(saved);
            self.depth += 1;
        }
        Ok(())
    }

    fn start_element(&mut self, e: &BytesStart, empty: bool, position: u64) -> Result<(), GlossaryError> {
        let (ns, local) = self.resolve_name(e.name().as_ref(), position)?;

        match self.depth {
            0 => {
                if self.seen_root {
                    return Err(GlossaryError::parse(position, "multiple root elements"));
                }
                if ns.as_deref() != Some(RDF_NS) || local != "RDF" {
                    return Err(GlossaryError::parse(
                        position,
                        format!("root element must be rdf:RDF, found <{}>", local),
                    ));
                }
                self.seen_root = true;
                // Bindings declared below the root stay local to their element
                self.parsed.namespaces = self.scope.clone();
                if let Some(base) = self.attribute(e, None, "xml:base", position)? {
                    self.base = Some(base);
                }
            }
            1 => self.start_node(e, ns.as_deref(), &local, empty, position)?,
            2 if self.current.is_some() => {
                self.start_property(e, ns.as_deref(), &local, empty, position)?
            }
            _ => {}
        }
        Ok(())
    }

    fn start_node(
        &mut self,
        e: &BytesStart,
        ns: Option<&str>,
        local: &str,
        empty: bool,
        position: u64,
    ) -> Result<(), GlossaryError> {
        let about = match self.attribute(e, Some(RDF_NS), "about", position)? {
            Some(about) => Some(self.resolve_iri(&about)),
            None => self
                .attribute(e, Some(RDF_NS), "ID", position)?
                .map(|id| self.resolve_iri(&format!("#{}", id))),
        };

        let is_concept = ns == Some(SKOS_NS) && local == "Concept";
        let is_description = ns == Some(RDF_NS) && local == "Description";

        if is_concept || is_description {
            let draft = ConceptDraft {
                iri: about.unwrap_or_default(),
                typed_concept: is_concept,
                ..Default::default()
            };
            if empty {
                self.finish_node(draft, position)?;
            } else {
                self.current = Some(draft);
            }
        } else if ns == Some(SKOS_NS) && local == "ConceptScheme" {
            if let Some(iri) = about {
                debug!("Found concept scheme {}", iri);
                self.parsed.schemes.push(iri);
            }
        }
        Ok(())
    }

    fn start_property(
        &mut self,
        e: &BytesStart,
        ns: Option<&str>,
        local: &str,
        empty: bool,
        position: u64,
    ) -> Result<(), GlossaryError> {
        let resource = self
            .attribute(e, Some(RDF_NS), "resource", position)?
            .map(|r| self.resolve_iri(&r));

        if ns == Some(RDF_NS) && local == "type" {
            let concept_type = format!("{}Concept", SKOS_NS);
            if resource.as_deref() == Some(concept_type.as_str()) {
                if let Some(draft) = self.current.as_mut() {
                    draft.typed_concept = true;
                }
            }
            return Ok(());
        }
        if ns != Some(SKOS_NS) {
            return Ok(());
        }

        let property = match local {
            "prefLabel" => PropertyKind::Text(TextProperty::PrefLabel),
            "altLabel" => PropertyKind::Text(TextProperty::AltLabel),
            "definition" => PropertyKind::Text(TextProperty::Definition),
            "notation" => PropertyKind::Text(TextProperty::Notation),
            "broader" => PropertyKind::Relation(RelationKind::Broader),
            "narrower" => PropertyKind::Relation(RelationKind::Narrower),
            "related" => PropertyKind::Relation(RelationKind::Related),
            "inScheme" => PropertyKind::InScheme,
            _ => PropertyKind::Other,
        };

        match property {
            PropertyKind::Text(text_property) => {
                if !empty {
                    let lang = self.attribute(e, None, "xml:lang", position)?;
                    self.text_property = Some((text_property, lang));
                    self.text.clear();
                }
            }
            PropertyKind::Relation(kind) => match (resource, self.current.as_mut()) {
                (Some(target), Some(draft)) => draft.relations.push((kind, target)),
                _ => debug!("Skipping {} without rdf:resource at byte {}", kind, position),
            },
            PropertyKind::InScheme => {
                if let Some(draft) = self.current.as_mut() {
                    draft.in_scheme = resource;
                }
            }
            PropertyKind::Other => {}
        }
        Ok(())
    }

    fn end(&mut self, position: u64) -> Result<(), GlossaryError> {
        self.depth = self.depth.saturating_sub(1);
        match self.depth {
            2 => {
                if let Some((property, lang)) = self.text_property.take() {
                    let text = std::mem::take(&mut self.text).trim().to_string();
                    if let Some(draft) = self.current.as_mut() {
                        match property {
                            TextProperty::PrefLabel => draft.pref_labels.push(LangString { lang, text }),
                            TextProperty::AltLabel => draft.alt_labels.push(text),
                            TextProperty::Definition => {
                                draft.definitions.push(LangString { lang, text })
                            }
                            TextProperty::Notation => draft.notations.push(text),
                        }
                    }
                }
            }
            1 => {
                if let Some(draft) = self.current.take() {
                    self.finish_node(draft, position)?;
                }
            }
            _ => {}
        }
        if let Some(saved) = self.saved_scopes.pop() {
            self.leave_scope(saved);
        }
        Ok(())
    }

    fn text(&mut self, text: &str) {
        if self.text_property.is_some() {
            self.text.push_str(text);
        }
    }

    fn finish_node(&mut self, draft: ConceptDraft, position: u64) -> Result<(), GlossaryError> {
        if !draft.typed_concept {
            return Ok(());
        }
        if draft.iri.is_empty() {
            return Err(GlossaryError::parse(
                position,
                "skos:Concept without rdf:about or rdf:ID",
            ));
        }
        self.parsed.drafts.push(draft);
        Ok(())
    }

    fn finish(self, position: u64) -> Result<ParsedVocabulary, GlossaryError> {
        if !self.seen_root {
            return Err(GlossaryError::parse(position, "document has no rdf:RDF root element"));
        }
        if self.depth != 0 {
            return Err(GlossaryError::parse(position, "unexpected end of document"));
        }
        Ok(self.parsed)
    }

    /// Apply the element's `xmlns` declarations, returning what they shadowed
    fn enter_scope(&mut self, e: &BytesStart, position: u64) -> Result<SavedScope, GlossaryError> {
        let mut saved = None;
        for attr in e.attributes() {
            let attr = attr.map_err(|err| GlossaryError::parse(position, err.to_string()))?;
            let key = std::str::from_utf8(attr.key.as_ref())
                .map_err(|err| GlossaryError::parse(position, err.to_string()))?;
            if key != "xmlns" && !key.starts_with("xmlns:") {
                continue;
            }
            if saved.is_none() {
                saved = Some((self.scope.clone(), self.default_ns.clone()));
            }
            let value = attribute_value(&attr.value, position)?;
            match key.strip_prefix("xmlns:") {
                Some(prefix) => self.scope.insert(prefix, value),
                None => self.default_ns = Some(value),
            }
        }
        Ok(saved)
    }

    fn leave_scope(&mut self, saved: SavedScope) {
        if let Some((scope, default_ns)) = saved {
            self.scope = scope;
            self.default_ns = default_ns;
        }
    }

    fn resolve_name(&self, raw: &[u8], position: u64) -> Result<(Option<String>, String), GlossaryError> {
        let name =
            std::str::from_utf8(raw).map_err(|err| GlossaryError::parse(position, err.to_string()))?;
        match name.split_once(':') {
            Some((prefix, local)) => match self.scope.get(prefix) {
                Some(ns) => Ok((Some(ns.to_string()), local.to_string())),
                None => Err(GlossaryError::parse(
                    position,
                    format!("undeclared namespace prefix '{}'", prefix),
                )),
            },
            None => Ok((self.default_ns.clone(), name.to_string())),
        }
    }

    /// Look up an attribute by namespace and local name. With `ns == None`
    /// the key is compared literally (used for `xml:*` attributes).
    fn attribute(
        &self,
        e: &BytesStart,
        ns: Option<&str>,
        name: &str,
        position: u64,
    ) -> Result<Option<String>, GlossaryError> {
        for attr in e.attributes() {
            let attr = attr.map_err(|err| GlossaryError::parse(position, err.to_string()))?;
            let key = std::str::from_utf8(attr.key.as_ref())
                .map_err(|err| GlossaryError::parse(position, err.to_string()))?;

            let matches = match ns {
                None => key == name,
                Some(ns) => match key.split_once(':') {
                    Some((prefix, local)) => {
                        local == name && self.scope.get(prefix) == Some(ns)
                    }
                    None => false,
                },
            };

            if matches {
                let value = attribute_value(&attr.value, position)?;
                return Ok(Some(value.trim().to_string()));
            }
        }
        Ok(None)
    }

    fn resolve_iri(&self, value: &str) -> String {
        if is_iri(value) {
            return value.to_string();
        }
        match &self.base {
            Some(base) if value.starts_with('#') => {
                format!("{}{}", base.trim_end_matches('#'), value)
            }
            Some(base) => match base.rfind('/') {
                Some(idx) => format!("{}{}", &base[..=idx], value),
                None => format!("{}{}", base, value),
            },
            None => value.to_string(),
        }
    }
}

fn attribute_value(raw: &[u8], position: u64) -> Result<String, GlossaryError> {
    let value =
        std::str::from_utf8(raw).map_err(|err| GlossaryError::parse(position, err.to_string()))?;
    let value = quick_xml::escape::unescape(value)
        .map_err(|err| GlossaryError::parse(position, err.to_string()))?;
    Ok(value.into_owned())
}
