//! Property tests for mapping resolution

use domain_forms::{FieldSet, MappingResolver, ResolveError, REQUIRED_PROPERTY};
use proptest::prelude::*;

fn field_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,11}"
}

fn field_set() -> impl Strategy<Value = FieldSet> {
    prop::collection::btree_map(field_name(), "[ -~]{0,24}", 0..8)
}

/// A mapping of one to six fields onto properties other than `email`
fn mapping_without_email() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec(
        (field_name(), "[a-z]{1,10}".prop_filter("not email", |p| p != REQUIRED_PROPERTY)),
        1..6,
    )
}

fn to_document(pairs: &[(String, String)]) -> String {
    let object: serde_json::Map<String, serde_json::Value> = pairs
        .iter()
        .map(|(f, p)| (f.clone(), serde_json::Value::String(p.clone())))
        .collect();
    serde_json::Value::Object(object).to_string()
}

proptest! {
    #[test]
    fn unparsable_documents_are_invalid_mapping(
        garbage in "[^{\\[\"0-9tfn \\t\\r\\n-][ -~]{0,40}",
        fields in field_set(),
    ) {
        prop_assert_eq!(
            MappingResolver::resolve(&garbage, &fields),
            Err(ResolveError::InvalidMapping)
        );
    }

    #[test]
    fn truncated_objects_are_invalid_mapping(pairs in mapping_without_email(), cut in 1usize..4) {
        let document = to_document(&pairs);
        let truncated = &document[..document.len() - cut.min(document.len() - 1)];
        prop_assert_eq!(
            MappingResolver::resolve(truncated, &FieldSet::new()),
            Err(ResolveError::InvalidMapping)
        );
    }

    #[test]
    fn no_mapped_field_present_is_no_mappable_fields(
        pairs in mapping_without_email(),
        fields in field_set(),
    ) {
        let fields: FieldSet = fields
            .into_iter()
            .filter(|(name, _)| !pairs.iter().any(|(f, _)| f == name))
            .collect();

        prop_assert_eq!(
            MappingResolver::resolve(&to_document(&pairs), &fields),
            Err(ResolveError::NoMappableFields)
        );
    }

    #[test]
    fn resolved_sets_without_email_are_rejected(
        pairs in mapping_without_email(),
        value in "[ -~]{0,24}",
    ) {
        let fields: FieldSet = pairs.iter().map(|(f, _)| (f.clone(), value.clone())).collect();

        prop_assert_eq!(
            MappingResolver::resolve(&to_document(&pairs), &fields),
            Err(ResolveError::MissingRequiredEmail)
        );
    }

    #[test]
    fn success_is_non_empty_and_has_email(
        mut pairs in mapping_without_email(),
        email in "[a-z]{1,8}@[a-z]{1,8}\\.com",
        fields in field_set(),
    ) {
        pairs.push(("contact_email".to_string(), REQUIRED_PROPERTY.to_string()));
        let mut fields = fields;
        fields.insert("contact_email".to_string(), email.clone());

        let props = MappingResolver::resolve(&to_document(&pairs), &fields).unwrap();
        prop_assert!(!props.is_empty());
        prop_assert_eq!(props.get(REQUIRED_PROPERTY), Some(&email));
        // Every emitted property comes from a mapped, submitted field
        for (property, value) in &props {
            prop_assert!(pairs.iter().any(|(f, p)| p == property && fields.get(f) == Some(value)));
        }
    }

    #[test]
    fn resolve_is_idempotent(pairs in mapping_without_email(), fields in field_set()) {
        let document = to_document(&pairs);
        prop_assert_eq!(
            MappingResolver::resolve(&document, &fields),
            MappingResolver::resolve(&document, &fields)
        );
    }
}

#[test]
fn documented_example_resolves_exactly() {
    let fields: FieldSet = [("name", "Ann"), ("email", "a@x.com"), ("referrer", "x")]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    let props = MappingResolver::resolve(r#"{"name":"firstname","email":"email"}"#, &fields).unwrap();

    let expected: FieldSet = [("firstname", "Ann"), ("email", "a@x.com")]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    assert_eq!(props, expected);
}
