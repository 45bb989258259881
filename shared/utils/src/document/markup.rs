//! Reader for the markup form of a DocuBricks document.
//!
//! The document is first read into a generic [`Element`] tree with
//! `quick-xml`, then mapped onto the model types. Text-valued tags that are
//! absent read as empty strings; a tag that occurs more than once where a
//! single value is expected is an error.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;

use docubricks_models::{
    AssemblyStep, AssemblyStepComponent, Author, Brick, BrickFunction, FunctionImplementation,
    ImplementationKind, MediaFile, Part, ProjectSnapshot, StepByStepInstruction,
};

use crate::error::{DocubricksError, DocubricksResult};

pub const ROOT_TAG: &str = "docubricks";

/// One element of a parsed markup document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub name: String,
    pub attributes: HashMap<String, String>,
    pub text: String,
    pub children: Vec<Element>,
}

impl Element {
    pub fn children_named<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == tag)
    }

    /// The single child with this tag, if any.
    pub fn child(&self, tag: &str) -> DocubricksResult<Option<&Element>> {
        let mut matches = self.children.iter().filter(|c| c.name == tag);
        let first = matches.next();
        if matches.next().is_some() {
            return Err(DocubricksError::document(format!(
                "Expected at most one <{}> in <{}>",
                tag, self.name
            )));
        }
        Ok(first)
    }

    /// Text of the single child with this tag, or an empty string.
    pub fn child_text(&self, tag: &str) -> DocubricksResult<String> {
        Ok(self.child(tag)?.map(|c| c.text.clone()).unwrap_or_default())
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn required_attribute(&self, key: &str) -> DocubricksResult<String> {
        self.attribute(key).map(str::to_string).ok_or_else(|| {
            DocubricksError::document(format!(
                "<{}> is missing the required '{}' attribute",
                self.name, key
            ))
        })
    }
}

fn start_element(start: &BytesStart<'_>) -> DocubricksResult<Element> {
    let mut element = Element {
        name: String::from_utf8_lossy(start.name().as_ref()).to_string(),
        ..Element::default()
    };
    for attribute in start.attributes() {
        let attribute = attribute.map_err(quick_xml::Error::from)?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).to_string();
        let value = attribute.unescape_value()?.to_string();
        element.attributes.insert(key, value);
    }
    Ok(element)
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> DocubricksResult<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => return Err(DocubricksError::document("Document has more than one root element")),
    }
    Ok(())
}

/// Reads a whole document into an element tree.
pub fn parse_tree(data: &[u8]) -> DocubricksResult<Element> {
    let mut reader = Reader::from_reader(data);
    reader.trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => stack.push(start_element(e)?),
            Event::Empty(ref e) => {
                let element = start_element(e)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(e) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&e.unescape()?);
                }
            }
            Event::CData(e) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| DocubricksError::document("Unbalanced closing tag"))?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(DocubricksError::document(format!("Unclosed <{}> element", open.name)));
    }
    root.ok_or_else(|| DocubricksError::document("Document is empty"))
}

/// Maps a `<docubricks>` document onto the model types.
pub fn parse_document(data: &[u8]) -> DocubricksResult<ProjectSnapshot> {
    let root = parse_tree(data)?;
    if root.name != ROOT_TAG {
        return Err(DocubricksError::document(format!(
            "Expected <{}> root element, found <{}>",
            ROOT_TAG, root.name
        )));
    }

    tracing::debug!("Parsing bricks");
    let bricks = root
        .children_named("brick")
        .map(brick_from)
        .collect::<DocubricksResult<Vec<_>>>()?;
    tracing::debug!("Parsing parts");
    let parts = root
        .children_named("physical_part")
        .map(part_from)
        .collect::<DocubricksResult<Vec<_>>>()?;
    tracing::debug!("Parsing authors");
    let authors = root
        .children_named("author")
        .map(author_from)
        .collect::<DocubricksResult<Vec<_>>>()?;

    Ok(ProjectSnapshot { bricks, parts, authors })
}

fn brick_from(element: &Element) -> DocubricksResult<Brick> {
    let functions = element
        .children_named("function")
        .enumerate()
        .map(|(index, f)| function_from(f, index))
        .collect::<DocubricksResult<Vec<_>>>()?;

    Ok(Brick {
        id: element.required_attribute("id")?,
        name: element.child_text("name")?,
        summary: element.child_text("abstract")?,
        long_description: element.child_text("long_description")?,
        notes: element.child_text("notes")?,
        license: element.child_text("license")?,
        files: media_from(element)?,
        authors: element.children_named("authors").map(|a| a.text.clone()).collect(),
        functions,
        instructions: element
            .children_named("assembly_instruction")
            .map(instruction_from)
            .collect::<DocubricksResult<Vec<_>>>()?,
    })
}

fn function_from(element: &Element, index: usize) -> DocubricksResult<BrickFunction> {
    Ok(BrickFunction {
        id: element.attribute("id").map(str::to_string).unwrap_or_else(|| index.to_string()),
        description: element.child_text("description")?,
        designator: element.child_text("designator")?,
        quantity: element.child_text("quantity")?,
        implementations: element
            .children_named("implementation")
            .map(implementation_from)
            .collect::<DocubricksResult<Vec<_>>>()?,
    })
}

fn implementation_from(element: &Element) -> DocubricksResult<FunctionImplementation> {
    let id = element.required_attribute("id")?;
    let kind = ImplementationKind::from(element.required_attribute("type")?);
    let quantity = parse_quantity(&element.child_text("quantity")?, &id)?;
    Ok(FunctionImplementation { kind, id, quantity })
}

/// Empty means unspecified, which aggregation later counts as one.
pub fn parse_quantity(text: &str, target: &str) -> DocubricksResult<f64> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(0.0);
    }
    text.parse::<f64>().map_err(|_| {
        DocubricksError::document(format!(
            "Invalid quantity '{}' for implementation '{}'",
            text, target
        ))
    })
}

fn part_from(element: &Element) -> DocubricksResult<Part> {
    Ok(Part {
        id: element.required_attribute("id")?,
        name: element.child_text("name")?,
        description: element.child_text("description")?,
        supplier: element.child_text("supplier")?,
        supplier_part_num: element.child_text("supplier_part_num")?,
        manufacturer_part_num: element.child_text("manufacturer_part_num")?,
        url: element.child_text("url")?,
        material_amount: element.child_text("material_amount")?,
        material_unit: element.child_text("material_unit")?,
        files: media_from(element)?,
        manufacturing_instruction: element
            .child("manufacturing_instruction")?
            .map(instruction_from)
            .transpose()?,
    })
}

fn author_from(element: &Element) -> DocubricksResult<Author> {
    Ok(Author {
        id: element.required_attribute("id")?,
        name: element.child_text("name")?,
        email: element.child_text("email")?,
        orcid: element.child_text("orcid")?,
        affiliation: element.child_text("affiliation")?,
    })
}

fn instruction_from(element: &Element) -> DocubricksResult<StepByStepInstruction> {
    Ok(StepByStepInstruction {
        name: element.attribute("name").unwrap_or_default().to_string(),
        steps: element.children_named("step").map(step_from).collect::<DocubricksResult<Vec<_>>>()?,
    })
}

fn step_from(element: &Element) -> DocubricksResult<AssemblyStep> {
    let components = element
        .children_named("component")
        .map(|c| -> DocubricksResult<AssemblyStepComponent> {
            Ok(AssemblyStepComponent {
                id: c.required_attribute("id")?,
                quantity: c.child_text("quantity")?,
            })
        })
        .collect::<DocubricksResult<Vec<_>>>()?;

    Ok(AssemblyStep {
        description: element.child_text("description")?,
        files: media_from(element)?,
        components,
    })
}

fn media_from(element: &Element) -> DocubricksResult<Vec<MediaFile>> {
    match element.child("media")? {
        Some(media) => media
            .children_named("file")
            .map(|f| -> DocubricksResult<MediaFile> {
                Ok(MediaFile::new(f.required_attribute("url")?))
            })
            .collect(),
        None => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<docubricks>
  <brick id="b1">
    <name>Stage</name>
    <abstract>An XY stage</abstract>
    <authors>a1</authors>
    <media><file url="images/stage.jpg"/></media>
    <function id="f1">
      <description>Holds the sample</description>
      <implementation type="physical_part" id="p1"><quantity>4</quantity></implementation>
      <implementation type="brick" id="b2"><quantity></quantity></implementation>
    </function>
    <function>
      <implementation type="part" id="p1"><quantity>0.5</quantity></implementation>
    </function>
    <assembly_instruction>
      <step>
        <description>Screw it &amp; tighten</description>
        <component id="p1"><quantity>2</quantity></component>
      </step>
    </assembly_instruction>
  </brick>
  <brick id="b2"><name>Leg</name></brick>
  <physical_part id="p1">
    <description>M3 screw</description>
    <material_unit>pcs</material_unit>
  </physical_part>
  <author id="a1"><name>Ada</name><email>ada@example.org</email></author>
</docubricks>"#;

    #[test]
    fn test_parse_document() {
        let snapshot = parse_document(DOC.as_bytes()).unwrap();

        assert_eq!(snapshot.bricks.len(), 2);
        assert_eq!(snapshot.parts.len(), 1);
        assert_eq!(snapshot.authors.len(), 1);

        let stage = &snapshot.bricks[0];
        assert_eq!(stage.id, "b1");
        assert_eq!(stage.summary, "An XY stage");
        assert_eq!(stage.authors, vec!["a1".to_string()]);
        assert_eq!(stage.files, vec![MediaFile::new("images/stage.jpg")]);
        assert_eq!(stage.functions.len(), 2);
        assert_eq!(stage.functions[1].id, "1");

        let implementations = &stage.functions[0].implementations;
        assert_eq!(implementations[0].kind, ImplementationKind::Part);
        assert_eq!(implementations[0].quantity, 4.0);
        assert_eq!(implementations[1].kind, ImplementationKind::Brick);
        assert_eq!(implementations[1].quantity, 0.0);

        let step = &stage.instructions[0].steps[0];
        assert_eq!(step.description, "Screw it & tighten");
        assert_eq!(step.components[0].quantity, "2");

        assert_eq!(snapshot.parts[0].description, "M3 screw");
        assert_eq!(snapshot.authors[0].email, "ada@example.org");
    }

    #[test]
    fn test_missing_id_is_fatal() {
        let doc = b"<docubricks><brick><name>x</name></brick></docubricks>";
        let err = parse_document(doc).unwrap_err();
        assert_eq!(err.error_code(), "DOCUMENT_ERROR");
        assert!(err.to_string().contains("'id'"));
    }

    #[test]
    fn test_missing_implementation_type_is_fatal() {
        let doc = br#"<docubricks><brick id="a"><function>
            <implementation id="p"/>
        </function></brick></docubricks>"#;
        assert!(parse_document(doc).is_err());
    }

    #[test]
    fn test_repeated_single_tag_is_fatal() {
        let doc = br#"<docubricks><brick id="a"><name>x</name><name>y</name></brick></docubricks>"#;
        let err = parse_document(doc).unwrap_err();
        assert!(err.to_string().contains("<name>"));
    }

    #[test]
    fn test_wrong_root_is_rejected() {
        assert!(parse_document(b"<project/>").is_err());
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("", "p").unwrap(), 0.0);
        assert_eq!(parse_quantity(" 2.5 ", "p").unwrap(), 2.5);
        assert!(parse_quantity("two", "p").is_err());
    }

    #[test]
    fn test_malformed_markup_is_rejected() {
        assert!(parse_tree(b"<docubricks><brick></docubricks>").is_err());
        assert!(parse_tree(b"").is_err());
    }
}
