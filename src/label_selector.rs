//! Label selector parsing and matching for fixture-backed lookups
//!
//! Accepts the Kubernetes selector string syntax:
//! - `key=value`, `key==value`, `key!=value`
//! - `key in (v1,v2)`, `key notin (v1,v2)`
//! - `key`, `!key`
//! - comma separated requirements, all of which must hold

use crate::{Error, Result};
use kube::core::{Expression, Selector, SelectorExt};
use std::collections::{BTreeMap, BTreeSet};

/// Split on top-level commas; commas inside `( )` belong to a value set
fn requirements(selector: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, ch) in selector.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&selector[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&selector[start..]);
    parts
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

fn value_set(requirement: &str, rest: &str) -> Result<BTreeSet<String>> {
    let inner = rest
        .trim()
        .strip_prefix('(')
        .and_then(|r| r.strip_suffix(')'))
        .ok_or_else(|| Error::InvalidRequest(format!("invalid set requirement: {requirement}")))?;
    Ok(inner
        .split(',')
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect())
}

fn key(requirement: &str, raw: &str) -> Result<String> {
    let key = raw.trim();
    if key.is_empty() || key.contains(char::is_whitespace) {
        return Err(Error::InvalidRequest(format!(
            "invalid label selector requirement: {requirement}"
        )));
    }
    Ok(key.to_string())
}

fn parse_requirement(requirement: &str) -> Result<Expression> {
    if let Some((k, rest)) = requirement.split_once(" notin ") {
        return Ok(Expression::NotIn(key(requirement, k)?, value_set(requirement, rest)?));
    }
    if let Some((k, rest)) = requirement.split_once(" in ") {
        return Ok(Expression::In(key(requirement, k)?, value_set(requirement, rest)?));
    }
    if let Some((k, v)) = requirement.split_once("!=") {
        return Ok(Expression::NotEqual(key(requirement, k)?, v.trim().to_string()));
    }
    if let Some((k, v)) = requirement
        .split_once("==")
        .or_else(|| requirement.split_once('='))
    {
        return Ok(Expression::Equal(key(requirement, k)?, v.trim().to_string()));
    }
    if let Some(k) = requirement.strip_prefix('!') {
        return Ok(Expression::DoesNotExist(key(requirement, k)?));
    }
    Ok(Expression::Exists(key(requirement, requirement)?))
}

/// Parse a selector string; an empty string selects everything
pub fn parse_label_selector(selector: &str) -> Result<Selector> {
    requirements(selector)
        .into_iter()
        .map(parse_requirement)
        .collect::<Result<Vec<_>>>()
        .map(Selector::from_iter)
}

/// Equality selector requiring every given label
pub fn selector_from_labels(labels: &BTreeMap<String, String>) -> Selector {
    labels
        .iter()
        .map(|(k, v)| Expression::Equal(k.clone(), v.clone()))
        .collect()
}

/// Whether `labels` satisfy the selector string
///
/// ```
/// use std::collections::BTreeMap;
/// use istio_kube_mock::label_selector::matches_label_selector;
///
/// let labels = BTreeMap::from([("app".to_string(), "reviews".to_string())]);
/// assert!(matches_label_selector(&labels, "app in (reviews,ratings)").unwrap());
/// assert!(!matches_label_selector(&labels, "app=details").unwrap());
/// ```
pub fn matches_label_selector(labels: &BTreeMap<String, String>, selector: &str) -> Result<bool> {
    Ok(parse_label_selector(selector)?.matches(labels))
}
