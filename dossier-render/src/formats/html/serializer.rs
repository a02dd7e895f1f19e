//! StyledNode → RcDom → HTML string

use crate::error::RenderError;
use crate::ir::styled::{Element, StyledNode};
use html5ever::{
    ns, serialize, serialize::SerializeOpts, serialize::TraversalScope, Attribute, LocalName,
    QualName,
};
use markup5ever_rcdom::{Handle, Node, NodeData, SerializableHandle};
use std::cell::{Cell, RefCell};
use std::default::Default;
use std::rc::Rc;

const REPORT_CSS: &str = include_str!("../../../css/report.css");

/// Serialize the tree as a bare fragment.
pub fn serialize_fragment(node: &StyledNode) -> Result<String, RenderError> {
    let handle = build_node(node);
    serialize_handle(&handle)
}

/// Serialize the tree as a complete page with the report stylesheet.
pub fn serialize_page(node: &StyledNode, title: &str, lang: &str) -> Result<String, RenderError> {
    let head = create_element("head", vec![]);
    append(&head, create_element("meta", vec![("charset", "UTF-8")]));
    append(
        &head,
        create_element(
            "meta",
            vec![
                ("name", "viewport"),
                ("content", "width=device-width, initial-scale=1.0"),
            ],
        ),
    );
    append(
        &head,
        create_element("meta", vec![("name", "generator"), ("content", "dossier")]),
    );
    let title_el = create_element("title", vec![]);
    append(&title_el, create_text(title));
    append(&head, title_el);
    let style = create_element("style", vec![]);
    append(&style, create_text(REPORT_CSS));
    append(&head, style);

    let body = create_element("body", vec![]);
    append(&body, build_node(node));

    let html = create_element("html", vec![("lang", lang)]);
    append(&html, head);
    append(&html, body);

    Ok(format!("<!DOCTYPE html>\n{}\n", serialize_handle(&html)?))
}

fn build_node(node: &StyledNode) -> Handle {
    match node {
        StyledNode::Text { text } => create_text(text),
        StyledNode::Element(element) => build_element(element),
    }
}

fn build_element(element: &Element) -> Handle {
    let mut attrs: Vec<(&str, &str)> = Vec::with_capacity(element.attrs.len() + 1);
    if let Some(class) = element.class {
        attrs.push(("class", class));
    }
    attrs.extend(
        element
            .attrs
            .iter()
            .map(|(name, value)| (*name, value.as_str())),
    );

    let handle = create_element(element.tag, attrs);
    for child in &element.children {
        append(&handle, build_node(child));
    }
    handle
}

fn append(parent: &Handle, child: Handle) {
    child.parent.set(Some(Rc::downgrade(parent)));
    parent.children.borrow_mut().push(child);
}

/// Create an HTML element with attributes
fn create_element(tag: &str, attrs: Vec<(&str, &str)>) -> Handle {
    let qual_name = QualName::new(None, ns!(html), LocalName::from(tag));
    let attributes = attrs
        .into_iter()
        .map(|(name, value)| Attribute {
            name: QualName::new(None, ns!(), LocalName::from(name)),
            value: value.to_string().into(),
        })
        .collect();

    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Element {
            name: qual_name,
            attrs: RefCell::new(attributes),
            template_contents: Default::default(),
            mathml_annotation_xml_integration_point: false,
        },
    })
}

fn create_text(text: &str) -> Handle {
    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Text {
            contents: RefCell::new(text.to_string().into()),
        },
    })
}

fn serialize_handle(handle: &Handle) -> Result<String, RenderError> {
    let mut output = Vec::new();
    let opts = SerializeOpts {
        traversal_scope: TraversalScope::IncludeNode,
        ..Default::default()
    };

    let serializable = SerializableHandle::from(handle.clone());
    serialize(&mut output, &serializable, opts)
        .map_err(|e| RenderError::Serialization(format!("HTML serialization failed: {}", e)))?;

    String::from_utf8(output)
        .map_err(|e| RenderError::Serialization(format!("UTF-8 conversion failed: {}", e)))
}
