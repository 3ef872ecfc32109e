//! Pre-built Test Fixtures
//!
//! Ready-to-use mapping documents, page layouts, and contact data. The
//! `fake_*` functions return a fresh random value on every call; the rest
//! are fixed so assertions can name them.

use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;

/// Maps `name` to `firstname` and `email` to `email`
pub const STANDARD_MAPPING: &str = r#"{"name":"firstname","email":"email"}"#;

/// A mapping covering every field of a typical contact form
pub const FULL_MAPPING: &str = r#"{"first_name":"firstname","last_name":"lastname","email":"email","phone":"phone","company":"company"}"#;

/// The stored default before an administrator saves a mapping
pub const EMPTY_MAPPING: &str = "{}";

/// Random but well-formed email address
pub fn fake_email() -> String {
    SafeEmail().fake()
}

pub fn fake_first_name() -> String {
    FirstName().fake()
}

pub fn fake_last_name() -> String {
    LastName().fake()
}

/// Fixture for contact form field values
pub struct ContactFixtures;

impl ContactFixtures {
    pub fn email() -> &'static str {
        "ann.lee@example.com"
    }

    pub fn first_name() -> &'static str {
        "Ann"
    }

    pub fn last_name() -> &'static str {
        "Lee"
    }

    pub fn phone() -> &'static str {
        "+1-555-0100"
    }

    /// Submitted field pairs matching every key of `FULL_MAPPING`
    pub fn full_submission() -> Vec<(&'static str, &'static str)> {
        vec![
            ("first_name", Self::first_name()),
            ("last_name", Self::last_name()),
            ("email", Self::email()),
            ("phone", Self::phone()),
            ("company", "Acme"),
        ]
    }
}

/// Fixture for stored builder layouts
pub struct LayoutFixtures;

impl LayoutFixtures {
    /// A flat layout holding one form module per id
    pub fn flat(form_ids: &[u64]) -> String {
        let modules: Vec<String> = form_ids
            .iter()
            .map(|id| format!(r#"{{"type":"form","formId":{}}}"#, id))
            .collect();
        format!(r#"{{"tree":[{}]}}"#, modules.join(","))
    }

    /// A layout whose tree is itself a JSON string, as the builder stores it
    pub fn nested(form_ids: &[u64]) -> String {
        let inner = Self::flat(form_ids);
        serde_json::json!({ "version": 2, "tree": inner }).to_string()
    }

    /// A layout with no form modules
    pub fn without_forms() -> String {
        r#"{"tree":[{"type":"text","content":"Hello"}]}"#.to_string()
    }
}
