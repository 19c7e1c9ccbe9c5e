use quick_xml::escape::unescape_with;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::tree::{Element, Node};
use crate::domain::ExtractionError;

/// Parse an XML file into its root element.
///
/// A missing file and a document that is not well-formed both come back as
/// `ExtractionError::DocumentParse`.
pub fn parse_document(path: impl AsRef<Path>) -> Result<Element, ExtractionError> {
    let path = path.as_ref();
    let file = File::open(path)
        .map_err(|e| ExtractionError::document(path, format!("cannot open file: {}", e)))?;

    let root = build_tree(Reader::from_reader(BufReader::new(file)))
        .map_err(|reason| ExtractionError::document(path, reason))?;

    tracing::debug!("Parsed {} (root <{}>)", path.display(), root.name());
    Ok(root)
}

pub fn parse_str(xml: &str) -> Result<Element, String> {
    build_tree(Reader::from_str(xml))
}

fn build_tree<R: BufRead>(mut reader: Reader<R>) -> Result<Element, String> {
    let mut buf = Vec::new();
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;
    // Internal DTD entities, name -> replacement text
    let mut entities: HashMap<String, String> = HashMap::new();

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| format!("{} (at byte {})", e, reader.buffer_position()))?;

        match event {
            Event::Start(e) => stack.push(start_element(&e, &entities)?),
            Event::Empty(e) => {
                let element = start_element(&e, &entities)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(e) => {
                let element = stack.pop().ok_or_else(|| {
                    format!(
                        "closing tag </{}> without an open element",
                        String::from_utf8_lossy(e.name().as_ref())
                    )
                })?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(e) => {
                let raw = std::str::from_utf8(&e).map_err(|e| e.to_string())?;
                let text = unescape(&normalize_newlines(raw), &entities)?;
                push_text(&mut stack, text)?;
            }
            Event::CData(e) => {
                let raw = std::str::from_utf8(&e).map_err(|e| e.to_string())?;
                push_text(&mut stack, normalize_newlines(raw).into_owned())?;
            }
            Event::DocType(e) => {
                let raw = std::str::from_utf8(&e).map_err(|e| e.to_string())?;
                collect_entities(raw, &mut entities);
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions
            _ => (),
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(format!("unexpected end of file: <{}> is not closed", open.name()));
    }

    root.ok_or_else(|| "document has no root element".to_string())
}

fn start_element(e: &BytesStart, entities: &HashMap<String, String>) -> Result<Element, String> {
    let mut element = Element::new(String::from_utf8_lossy(e.name().as_ref()));

    for attr in e.attributes() {
        let attr = attr.map_err(|e| e.to_string())?;
        let raw = std::str::from_utf8(&attr.value).map_err(|e| e.to_string())?;
        let value = unescape(raw, entities)?;
        element = element.with_attribute(String::from_utf8_lossy(attr.key.as_ref()), value);
    }

    Ok(element)
}

/// Resolve character references, the five predefined entities and the
/// document's own internal entities
fn unescape(raw: &str, entities: &HashMap<String, String>) -> Result<String, String> {
    unescape_with(raw, |name| match name {
        "lt" => Some("<"),
        "gt" => Some(">"),
        "amp" => Some("&"),
        "apos" => Some("'"),
        "quot" => Some("\""),
        _ => entities.get(name).map(String::as_str),
    })
    .map(Cow::into_owned)
    .map_err(|e| e.to_string())
}

/// `\r\n` and lone `\r` become `\n`, as any XML processor must do
fn normalize_newlines(raw: &str) -> Cow<'_, str> {
    if raw.contains('\r') {
        Cow::Owned(raw.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(raw)
    }
}

/// Pick up `<!ENTITY name "value">` declarations from the internal subset.
/// Parameter and external entities are ignored; the replacement text is
/// used as written, without expanding references inside it. The first
/// declaration of a name wins.
fn collect_entities(doctype: &str, entities: &mut HashMap<String, String>) {
    const DECL: &str = "<!ENTITY";

    let mut rest = doctype;
    while let Some(start) = rest.find(DECL) {
        rest = rest[start + DECL.len()..].trim_start();
        if rest.starts_with('%') {
            continue;
        }

        let name_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let name = &rest[..name_end];
        rest = rest[name_end..].trim_start();

        let Some(quote) = rest.chars().next().filter(|c| *c == '"' || *c == '\'') else {
            continue;
        };
        let body = &rest[1..];
        let Some(end) = body.find(quote) else {
            break;
        };

        entities
            .entry(name.to_string())
            .or_insert_with(|| body[..end].to_string());
        rest = &body[end + 1..];
    }
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), String> {
    if let Some(parent) = stack.last_mut() {
        parent.push(Node::Element(element));
    } else if root.is_some() {
        return Err(format!("second root element <{}>", element.name()));
    } else {
        *root = Some(element);
    }
    Ok(())
}

fn push_text(stack: &mut [Element], text: String) -> Result<(), String> {
    match stack.last_mut() {
        Some(parent) => parent.push(Node::Text(text)),
        None if text.trim().is_empty() => (),
        None => return Err("text outside the root element".to_string()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_element() {
        let root = parse_str(
            r#"<?xml version="1.0" encoding="UTF-8"?>
               <bigFish>Moby Dick</bigFish>"#,
        )
        .unwrap();
        assert_eq!(root.name(), "bigFish");
        assert_eq!(root.text(), "Moby Dick");
    }

    #[test]
    fn test_entities_and_cdata_are_text() {
        let root = parse_str("<label>Tom &amp; <![CDATA[Jerry]]></label>").unwrap();
        assert_eq!(root.text(), "Tom & Jerry");
    }

    #[test]
    fn test_comment_splits_text() {
        let root = parse_str("<label>Moby<!-- whale --> Dick</label>").unwrap();
        assert_eq!(root.children().len(), 2);
        assert_eq!(root.text(), "Moby Dick");
    }

    #[test]
    fn test_nested_structure_and_attributes() {
        let root = parse_str(
            r#"<rdf:RDF xmlns:rdf="r" xmlns:skos="s">
                 <skos:Collection rdf:about="http://c/">
                   <skos:prefLabel>Codes</skos:prefLabel>
                   <skos:member>
                     <skos:Concept rdf:about="http://c/1/">
                       <skos:prefLabel xml:lang="en">One</skos:prefLabel>
                       <skos:altLabel/>
                     </skos:Concept>
                   </skos:member>
                 </skos:Collection>
               </rdf:RDF>"#,
        )
        .unwrap();

        let collection = root.child("skos:Collection").unwrap();
        assert_eq!(collection.attribute("rdf:about"), Some("http://c/"));

        let concepts: Vec<&Element> = root.descendants_named("skos:Concept").collect();
        assert_eq!(concepts.len(), 1);
        let label = concepts[0].child("skos:prefLabel").unwrap();
        assert_eq!(label.attribute("xml:lang"), Some("en"));
        assert_eq!(label.text(), "One");
        assert_eq!(concepts[0].child("skos:altLabel").unwrap().text(), "");
    }

    #[test]
    fn test_unclosed_element_is_error() {
        assert!(parse_str("<a><b>text</b>").is_err());
    }

    #[test]
    fn test_mismatched_end_is_error() {
        assert!(parse_str("<a><b></a></b>").is_err());
    }

    #[test]
    fn test_second_root_is_error() {
        assert!(parse_str("<a/><b/>").is_err());
    }

    #[test]
    fn test_empty_document_is_error() {
        assert!(parse_str("").is_err());
        assert!(parse_str("   ").is_err());
    }

    #[test]
    fn test_unknown_entity_is_error() {
        assert!(parse_str("<a>&bogus;</a>").is_err());
    }

    #[test]
    fn test_line_endings_normalized() {
        let root = parse_str("<a>x\r\ny\rz<![CDATA[\r\n]]></a>").unwrap();
        assert_eq!(root.text(), "x\ny\nz");
        assert!(!root.children().iter().filter_map(Node::as_text).any(|t| t.contains('\r')));
    }

    #[test]
    fn test_char_reference_carriage_return_kept() {
        let root = parse_str("<a>x&#13;y</a>").unwrap();
        assert_eq!(root.text(), "x\ry");
    }

    #[test]
    fn test_internal_entities_resolved() {
        let root = parse_str(
            r#"<!DOCTYPE a [
                 <!ENTITY ship "Kon-Tiki">
                 <!ENTITY flag 'NO'>
                 <!ENTITY ship "Ra II">
                 <!ENTITY % param "ignored">
                 <!ENTITY logo SYSTEM "logo.png">
               ]>
               <a code="&flag;">&ship; &amp; crew</a>"#,
        )
        .unwrap();
        assert_eq!(root.text(), "Kon-Tiki & crew");
        assert_eq!(root.attribute("code"), Some("NO"));
    }

    #[test]
    fn test_missing_file_is_document_error() {
        let err = parse_document("/nonexistent/ICES_vessel_sample.xml").unwrap_err();
        assert!(matches!(err, ExtractionError::DocumentParse { .. }));
    }
}
