//! Tests for label selector parsing and matching

use super::label_selector::{matches_label_selector, parse_label_selector, selector_from_labels};
use kube::core::SelectorExt;
use std::collections::BTreeMap;

fn reviews_v1() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("app".to_string(), "reviews".to_string()),
        ("version".to_string(), "v1".to_string()),
    ])
}

#[test]
fn test_empty_selector_matches_everything() {
    assert!(matches_label_selector(&reviews_v1(), "").unwrap());
    assert!(matches_label_selector(&BTreeMap::new(), "  ").unwrap());
}

#[test]
fn test_equality() {
    let labels = reviews_v1();
    assert!(matches_label_selector(&labels, "app=reviews").unwrap());
    assert!(matches_label_selector(&labels, "app == reviews").unwrap());
    assert!(!matches_label_selector(&labels, "app=ratings").unwrap());
}

#[test]
fn test_inequality() {
    let labels = reviews_v1();
    assert!(matches_label_selector(&labels, "version!=v2").unwrap());
    assert!(!matches_label_selector(&labels, "version!=v1").unwrap());
}

#[test]
fn test_set_based() {
    let labels = reviews_v1();
    assert!(matches_label_selector(&labels, "version in (v1, v2)").unwrap());
    assert!(!matches_label_selector(&labels, "version in (v2,v3)").unwrap());
    assert!(matches_label_selector(&labels, "version notin (v2,v3)").unwrap());
    assert!(!matches_label_selector(&labels, "version notin (v1)").unwrap());
}

#[test]
fn test_existence() {
    let labels = reviews_v1();
    assert!(matches_label_selector(&labels, "app").unwrap());
    assert!(!matches_label_selector(&labels, "!app").unwrap());
    assert!(matches_label_selector(&labels, "!security.istio.io/tlsMode").unwrap());
}

#[test]
fn test_combined_requirements() {
    let labels = reviews_v1();
    assert!(matches_label_selector(&labels, "app=reviews,version in (v1,v2)").unwrap());
    assert!(!matches_label_selector(&labels, "app=reviews,version in (v2,v3)").unwrap());
}

#[test]
fn test_invalid_selectors() {
    assert!(parse_label_selector("version in v1").is_err());
    assert!(parse_label_selector("=v1").is_err());
    assert!(matches_label_selector(&reviews_v1(), "app reviews").is_err());
}

#[test]
fn test_selector_from_labels() {
    let service_selector = BTreeMap::from([("app".to_string(), "reviews".to_string())]);
    let selector = selector_from_labels(&service_selector);

    assert!(selector.matches(&reviews_v1()));
    assert!(!selector.matches(&BTreeMap::from([(
        "app".to_string(),
        "ratings".to_string()
    )])));
}
