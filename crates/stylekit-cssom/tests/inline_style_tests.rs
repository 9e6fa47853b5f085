//! Inline style declarations bound to DOM elements.

use std::rc::Rc;
use stylekit_common::{init_logging, StyleConfig};
use stylekit_cssom::{CssStyleDeclaration, CssomError, PropertyStore, StoreOptions};
use stylekit_dom::{Document, Node};

fn init_tracing() {
    // Every test initializes; only the first call installs the subscriber.
    let _ = init_logging(&StyleConfig::default().log_config());
}

fn connected_div(doc: &Document) -> Rc<Node> {
    let div = doc.create_element("div");
    doc.root().append_child(div.clone());
    div
}

#[test]
fn attribute_is_created_and_removed() {
    init_tracing();
    let doc = Document::new();
    let div = connected_div(&doc);
    assert!(!div.has_attribute("style"));

    let mut style = CssStyleDeclaration::for_element(&div);
    style.set_property("color", "red", None).unwrap();
    assert_eq!(div.get_attribute("style"), Some("color: red;".to_string()));
    assert_eq!(style.get_property_value("color"), "red");

    style.remove_property("color").unwrap();
    assert!(!div.has_attribute("style"));
    assert_eq!(style.length(), 0);
}

#[test]
fn every_mutation_bumps_cache_id_once_when_connected() {
    init_tracing();
    let doc = Document::new();
    let div = connected_div(&doc);
    let mut style = CssStyleDeclaration::for_element(&div);

    let start = doc.cache_id();
    style.set_css_text("color: red; width: 1px").unwrap();
    assert_eq!(doc.cache_id(), start + 1);
    style.set_property("height", "2px", Some("important")).unwrap();
    assert_eq!(doc.cache_id(), start + 2);
    style.remove_property("width").unwrap();
    assert_eq!(doc.cache_id(), start + 3);
    style.set_property("color", "", None).unwrap();
    assert_eq!(doc.cache_id(), start + 4);

    // Rejected priorities are not mutations.
    style.set_property("color", "blue", Some("later")).unwrap();
    assert_eq!(doc.cache_id(), start + 4);
}

#[test]
fn disconnected_element_does_not_bump_cache_id() {
    init_tracing();
    let doc = Document::new();
    let div = doc.create_element("div");
    let mut style = CssStyleDeclaration::for_element(&div);

    style.set_property("color", "red", None).unwrap();
    style.set_css_text("width: 1px").unwrap();
    style.remove_property("width").unwrap();
    assert_eq!(doc.cache_id(), 0);

    doc.root().append_child(div.clone());
    style.set_property("color", "red", None).unwrap();
    assert_eq!(doc.cache_id(), 1);
}

#[test]
fn style_writes_do_not_notify_attribute_observers() {
    init_tracing();
    let doc = Document::new();
    let div = connected_div(&doc);
    let mut style = CssStyleDeclaration::for_element(&div);

    style.set_property("color", "red", None).unwrap();
    style.remove_property("color").unwrap();
    assert!(doc.take_mutations().is_empty());

    // A regular attribute write is observed, and the style view follows it.
    div.set_attribute("style", "color: green");
    assert_eq!(doc.take_mutations().len(), 1);
    assert_eq!(style.get_property_value("color"), "green");
}

#[test]
fn two_declarations_on_one_element_agree() {
    init_tracing();
    let doc = Document::new();
    let div = connected_div(&doc);
    let mut first = CssStyleDeclaration::for_element(&div);
    let second = CssStyleDeclaration::for_element(&div);

    first.set_property("margin", "1px 2px 3px", None).unwrap();
    assert_eq!(second.length(), 4);
    assert_eq!(second.get_property_value("margin-left"), "2px");
    assert_eq!(second.get_property_value("margin"), "1px 2px 3px");
    assert_eq!(second.css_text(), first.css_text());
}

#[test]
fn computed_declaration_rejects_mutation() {
    init_tracing();
    let doc = Document::parse_html(
        r#"<html><body><p id="p" style="color: blue; padding: 2px !important">x</p></body></html>"#,
    )
    .unwrap();
    let p = doc.get_element_by_id("p").unwrap();
    let mut computed = CssStyleDeclaration::computed(&p);
    let start = doc.cache_id();

    let err = computed.set_property("color", "red", None).unwrap_err();
    assert!(err.to_string().contains("setProperty"));
    assert!(err.to_string().contains("color"));
    assert!(matches!(err, CssomError::ReadOnly { .. }));

    assert_eq!(computed.get_property_value("color"), "blue");
    assert_eq!(computed.get_property_priority("padding"), "important");
    assert_eq!(computed.css_text(), "");
    assert_eq!(computed.length(), 5);
    assert_eq!(doc.cache_id(), start);
    assert_eq!(
        p.get_attribute("style"),
        Some("color: blue; padding: 2px !important".to_string())
    );
}

#[test]
fn parsed_attribute_is_normalized_on_first_write() {
    init_tracing();
    let doc =
        Document::parse_html(r#"<div id="d" style="COLOR :red;;bogus; WIDTH: 1px">x</div>"#).unwrap();
    let d = doc.get_element_by_id("d").unwrap();
    let mut style = CssStyleDeclaration::for_element(&d);

    assert_eq!(style.length(), 2);
    style.set_property("width", "2px", None).unwrap();
    assert_eq!(
        d.get_attribute("style"),
        Some("color: red; width: 2px;".to_string())
    );
    assert_eq!(style.item(0), "color");
    assert_eq!(style.item(1), "width");
}

#[test]
fn set_css_text_through_bound_declaration() {
    init_tracing();
    let doc = Document::new();
    let div = connected_div(&doc);
    div.set_attribute("style", "color: red");
    let mut style = CssStyleDeclaration::for_element(&div);

    style.set_css_text("border: 1px solid black").unwrap();
    assert_eq!(style.length(), 12);
    assert_eq!(style.get_property_value("border"), "1px solid black");
    assert_eq!(style.get_property_value("color"), "");

    let reparsed = PropertyStore::parse(&div.get_attribute("style").unwrap());
    assert_eq!(reparsed.len(), 12);

    style.remove_property("border").unwrap();
    assert!(!div.has_attribute("style"));
}

#[test]
fn bound_declaration_with_expansion_disabled() {
    init_tracing();
    let doc = Document::new();
    let div = connected_div(&doc);
    let options = StoreOptions {
        expand_shorthands: false,
    };
    let mut style = CssStyleDeclaration::bound(&div, false, options);

    style.set_property("padding", "1px 2px", None).unwrap();
    assert_eq!(div.get_attribute("style"), Some("padding: 1px 2px;".to_string()));
    assert_eq!(style.get_property_value("padding-top"), "");
}

#[test]
fn declaration_outlives_document_tree_removal() {
    init_tracing();
    let doc = Document::new();
    let div = connected_div(&doc);
    let mut style = CssStyleDeclaration::for_element(&div);
    style.set_property("color", "red", None).unwrap();
    assert_eq!(doc.cache_id(), 1);

    doc.root().remove_child(&div).unwrap();
    style.set_property("color", "blue", None).unwrap();
    assert_eq!(doc.cache_id(), 1);
    assert_eq!(div.get_attribute("style"), Some("color: blue;".to_string()));
    assert!(Rc::ptr_eq(&style.parent_element().unwrap(), &div));
}

#[test]
fn bound_declarations_agree_after_unusual_values() {
    init_tracing();
    let doc = Document::new();
    let div = connected_div(&doc);
    let mut writer = CssStyleDeclaration::for_element(&div);
    let reader = CssStyleDeclaration::for_element(&div);

    writer.set_property("background-image", "url(", None).unwrap();
    writer.set_property("x(", "1", None).unwrap();
    writer.set_property("content", "'a; b'", None).unwrap();
    writer.set_property("aspect-ratio", "4 / 3", None).unwrap();
    writer.set_property("color", "red; width: 1px", None).unwrap();
    writer.set_property("color", "red", None).unwrap();

    assert_eq!(
        div.get_attribute("style"),
        Some("content: 'a; b'; aspect-ratio: 4 / 3; color: red;".to_string())
    );
    assert_eq!(reader.length(), 3);
    assert_eq!(reader.get_property_value("content"), "'a; b'");
    assert_eq!(reader.get_property_value("color"), "red");
    assert_eq!(reader.get_property_value("width"), "");
    assert_eq!(reader.css_text(), writer.css_text());
}
