//! Tests for ordered attribute storage and namespaces.

use heron_dom::{Attributes, DomAttribute, Namespace};

#[test]
fn test_attributes_keep_insertion_order() {
    let mut attrs = Attributes::new();
    attrs.set("width", "150");
    attrs.set("viewBox", "2");
    attrs.set("class", "a b");

    let names: Vec<String> = attrs.iter().map(DomAttribute::qualified_name).collect();
    assert_eq!(names, vec!["width", "viewBox", "class"]);
}

#[test]
fn test_set_replaces_existing_value() {
    let mut attrs = Attributes::new();
    attrs.set("id", "a");
    attrs.set("id", "b");

    assert_eq!(attrs.len(), 1);
    assert_eq!(attrs.get("id"), Some("b"));
}

#[test]
fn test_insert_keeps_first_occurrence() {
    let mut attrs = Attributes::new();
    assert!(attrs.insert(DomAttribute::new("id", "first")));
    assert!(!attrs.insert(DomAttribute::new("id", "second")));

    assert_eq!(attrs.get("id"), Some("first"));
}

#[test]
fn test_prefixed_attribute_lookup_uses_qualified_name() {
    let mut attrs = Attributes::new();
    let _ = attrs.insert(DomAttribute {
        namespace: Some(Namespace::XLink),
        prefix: Some("xlink".to_string()),
        local_name: "href".to_string(),
        value: "#a".to_string(),
    });

    assert_eq!(attrs.get("xlink:href"), Some("#a"));
    assert!(!attrs.contains("href"));
    assert_eq!(attrs.remove("xlink:href").as_deref(), Some("#a"));
    assert!(attrs.is_empty());
}

#[test]
fn test_namespace_urls_round_trip() {
    for ns in [Namespace::Html, Namespace::MathMl, Namespace::Svg, Namespace::XLink] {
        assert_eq!(Namespace::from_url(ns.url()), Some(ns));
    }
    assert!(Namespace::Svg.is_local());
    assert!(!Namespace::XLink.is_local());
    assert_eq!(Namespace::from_url("urn:unknown"), None);
}
