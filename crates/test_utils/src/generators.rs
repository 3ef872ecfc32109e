//! Property-Based Test Generators
//!
//! Proptest strategies for submissions, mappings, and layouts.

use proptest::collection::{btree_map, btree_set, vec};
use proptest::prelude::*;

use domain_forms::{FieldSet, RESERVED_FIELDS};

/// Strategy for form field names, never one of the reserved metadata keys
pub fn field_name_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,15}".prop_filter("reserved field name", |name| {
        !RESERVED_FIELDS.contains(&name.as_str())
    })
}

/// Strategy for submitted field values, including empty and unicode text
pub fn field_value_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[a-zA-Z0-9 .@+-]{1,40}",
        "\\PC{1,20}",
    ]
}

/// Strategy for a set of submitted user fields
pub fn field_set_strategy() -> impl Strategy<Value = FieldSet> {
    btree_map(field_name_strategy(), field_value_strategy(), 0..8)
}

/// Strategy for CRM property names
pub fn property_name_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("email".to_string()),
        Just("firstname".to_string()),
        Just("lastname".to_string()),
        Just("phone".to_string()),
        "[a-z]{3,12}",
    ]
}

/// Strategy for a well-formed mapping document
pub fn mapping_document_strategy() -> impl Strategy<Value = String> {
    btree_map(field_name_strategy(), property_name_strategy(), 1..6).prop_map(|pairs| {
        serde_json::Value::Object(
            pairs
                .into_iter()
                .map(|(field, property)| (field, serde_json::Value::String(property)))
                .collect(),
        )
        .to_string()
    })
}

/// Strategy for host form ids
pub fn form_id_strategy() -> impl Strategy<Value = u64> {
    1u64..100_000
}

/// Strategy for a set of enabled form ids
pub fn enabled_form_ids_strategy() -> impl Strategy<Value = Vec<u64>> {
    btree_set(form_id_strategy(), 0..6).prop_map(|ids| ids.into_iter().collect())
}

/// Strategy for the form ids embedded in one page
pub fn embedded_form_ids_strategy() -> impl Strategy<Value = Vec<u64>> {
    vec(form_id_strategy(), 0..4)
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn field_names_are_never_reserved(name in field_name_strategy()) {
            prop_assert!(!RESERVED_FIELDS.contains(&name.as_str()));
        }

        #[test]
        fn mapping_documents_are_json_objects(doc in mapping_document_strategy()) {
            let value: serde_json::Value = serde_json::from_str(&doc).unwrap();
            prop_assert!(value.is_object());
            prop_assert!(!value.as_object().unwrap().is_empty());
        }
    }
}
