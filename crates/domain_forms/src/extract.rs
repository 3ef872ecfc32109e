//! Locating embedded forms in page layouts
//!
//! `FormIdExtractor` is the capability form discovery depends on. Hosts that
//! can enumerate a page's forms natively supply their own implementation;
//! otherwise `LayoutFormIdExtractor` reads the stored builder layout.
//!
//! Builder layouts are JSON documents in which a form element carries a
//! numeric `formId` property. The element tree is often stored as a JSON
//! string inside the outer document, so string values that hold JSON are
//! parsed and searched as well.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

use core_kernel::FormId;

use crate::ports::Page;

/// Property name that marks a form element in a builder layout
pub const FORM_ID_PROPERTY: &str = "formId";

// Bounds nesting of layouts embedded in layouts.
const MAX_DEPTH: usize = 64;

static LEGACY_FORM_ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""formId":(\d+)"#).expect("form id pattern is valid"));

/// Finds the form identifiers embedded in a page
pub trait FormIdExtractor: Send + Sync {
    /// De-duplicated form ids embedded in `page`; empty when there are none
    fn list_embedded_form_ids(&self, page: &Page) -> BTreeSet<FormId>;
}

/// Reads form ids out of the page's stored layout document
///
/// Layouts that are not JSON at all are scanned with the legacy
/// `"formId":<digits>` pattern instead.
#[derive(Debug, Default, Clone, Copy)]
pub struct LayoutFormIdExtractor;

impl LayoutFormIdExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl FormIdExtractor for LayoutFormIdExtractor {
    fn list_embedded_form_ids(&self, page: &Page) -> BTreeSet<FormId> {
        let Some(layout) = page.layout.as_deref().filter(|l| !l.trim().is_empty()) else {
            return BTreeSet::new();
        };

        match serde_json::from_str::<Value>(layout) {
            Ok(document) => {
                let mut ids = BTreeSet::new();
                collect_form_ids(&document, 0, &mut ids);
                ids
            }
            Err(e) => {
                debug!(page_id = %page.id, error = %e, "Layout is not JSON, scanning as text");
                scan_form_ids(layout)
            }
        }
    }
}

/// Text scan for `"formId":<digits>`, for layouts that are not JSON
#[derive(Debug, Default, Clone, Copy)]
pub struct PatternFormIdExtractor;

impl FormIdExtractor for PatternFormIdExtractor {
    fn list_embedded_form_ids(&self, page: &Page) -> BTreeSet<FormId> {
        page.layout.as_deref().map(scan_form_ids).unwrap_or_default()
    }
}

fn scan_form_ids(text: &str) -> BTreeSet<FormId> {
    LEGACY_FORM_ID_PATTERN
        .captures_iter(text)
        .filter_map(|caps| caps.get(1)?.as_str().parse::<FormId>().ok())
        .collect()
}

fn collect_form_ids(value: &Value, depth: usize, ids: &mut BTreeSet<FormId>) {
    if depth > MAX_DEPTH {
        return;
    }
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                if key == FORM_ID_PROPERTY {
                    if let Some(id) = child.as_u64() {
                        ids.insert(FormId::new(id));
                        continue;
                    }
                }
                collect_form_ids(child, depth + 1, ids);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_form_ids(item, depth + 1, ids);
            }
        }
        Value::String(s) if looks_like_json_container(s) => {
            if let Ok(nested) = serde_json::from_str::<Value>(s) {
                collect_form_ids(&nested, depth + 1, ids);
            }
        }
        _ => {}
    }
}

fn looks_like_json_container(s: &str) -> bool {
    let s = s.trim_start();
    s.starts_with('{') || s.starts_with('[')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(layout: &str) -> Page {
        Page::new(1, "Contact", Some(layout.to_string()))
    }

    fn ids(values: &[u64]) -> BTreeSet<FormId> {
        values.iter().copied().map(FormId::new).collect()
    }

    #[test]
    fn test_structured_layout() {
        let layout = r#"{"root":{"children":[{"type":"Form","data":{"formId":12}},{"type":"Form","data":{"formId":7}}]}}"#;
        assert_eq!(LayoutFormIdExtractor.list_embedded_form_ids(&page(layout)), ids(&[7, 12]));
    }

    #[test]
    fn test_duplicates_within_page_collapse() {
        let layout = r#"[{"formId":3},{"formId":3},{"x":{"formId":3}}]"#;
        assert_eq!(LayoutFormIdExtractor.list_embedded_form_ids(&page(layout)), ids(&[3]));
    }

    #[test]
    fn test_nested_encoded_tree() {
        let inner = r#"{"root":{"children":[{"formId":44}]}}"#;
        let outer = serde_json::json!({ "tree_json_string": inner }).to_string();
        assert_eq!(LayoutFormIdExtractor.list_embedded_form_ids(&page(&outer)), ids(&[44]));
    }

    #[test]
    fn test_non_numeric_form_ids_are_ignored() {
        let layout = r#"{"a":{"formId":"12"},"b":{"formId":-1},"c":{"formId":2.5}}"#;
        assert!(LayoutFormIdExtractor.list_embedded_form_ids(&page(layout)).is_empty());
    }

    #[test]
    fn test_non_json_layout_falls_back_to_pattern() {
        let layout = r#"a:1:{s:4:"tree";s:30:"{"formId":5,"label":"Form 6"}";}"#;
        assert_eq!(LayoutFormIdExtractor.list_embedded_form_ids(&page(layout)), ids(&[5]));
    }

    #[test]
    fn test_pattern_requires_digits_right_after_colon() {
        let text = r#""formId": 9 "formId":10 "formId":"11""#;
        assert_eq!(scan_form_ids(text), ids(&[10]));
    }

    #[test]
    fn test_missing_or_blank_layout() {
        let blank = Page::new(2, "Blank", Some("   ".to_string()));
        let none = Page::new(3, "Classic", None);
        assert!(LayoutFormIdExtractor.list_embedded_form_ids(&blank).is_empty());
        assert!(LayoutFormIdExtractor.list_embedded_form_ids(&none).is_empty());
        assert!(PatternFormIdExtractor.list_embedded_form_ids(&none).is_empty());
    }
}
