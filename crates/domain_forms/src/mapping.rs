//! Field mapping and resolution
//!
//! A field mapping document is a JSON object written by the administrator:
//!
//! ```json
//! {"name": "firstname", "email": "email", "company": "company"}
//! ```
//!
//! Keys are submitted form field names, values are CRM property names.
//! Resolution turns a submitted field set into the property set sent to the
//! CRM:
//!
//! 1. the document must parse as a non-empty object of string values
//! 2. each mapped field that was submitted yields `property -> value`;
//!    unmapped fields and mapped-but-missing fields are dropped silently
//! 3. an empty result is rejected
//! 4. a result without an `email` property is rejected
//!
//! Resolution is a pure function of its two inputs.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};

use crate::error::ResolveError;

/// Submitted form fields, by field name
pub type FieldSet = BTreeMap<String, String>;

/// CRM contact properties, by property name
pub type PropertyMap = BTreeMap<String, String>;

/// Property every contact must carry
pub const REQUIRED_PROPERTY: &str = "email";

/// Parsed field mapping document
///
/// Entries keep document order. When two source fields target the same
/// property, the later entry's value wins during resolution.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldMapping {
    entries: Vec<(String, String)>,
}

impl FieldMapping {
    /// Parses a mapping document
    ///
    /// Fails with `InvalidMapping` when the text is not JSON, is not an
    /// object, has a non-string value, or is empty.
    pub fn parse(document: &str) -> Result<Self, ResolveError> {
        let mapping: FieldMapping =
            serde_json::from_str(document).map_err(|_| ResolveError::InvalidMapping)?;
        if mapping.is_empty() {
            return Err(ResolveError::InvalidMapping);
        }
        Ok(mapping)
    }

    /// Builds a mapping from `(form_field, crm_property)` pairs
    pub fn from_pairs<I, F, P>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (F, P)>,
        F: Into<String>,
        P: Into<String>,
    {
        let mut mapping = FieldMapping::default();
        for (field, property) in pairs {
            mapping.insert(field.into(), property.into());
        }
        mapping
    }

    /// `(form_field, crm_property)` pairs in document order
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(f, p)| (f.as_str(), p.as_str()))
    }

    /// Number of mapped fields
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is mapped
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copies mapped submitted values onto their CRM property names
    pub fn apply(&self, fields: &FieldSet) -> PropertyMap {
        self.entries
            .iter()
            .filter_map(|(field, property)| {
                fields.get(field).map(|value| (property.clone(), value.clone()))
            })
            .collect()
    }

    // A repeated key replaces the earlier value in place, as JSON decoders do.
    fn insert(&mut self, field: String, property: String) {
        match self.entries.iter_mut().find(|(f, _)| *f == field) {
            Some(entry) => entry.1 = property,
            None => self.entries.push((field, property)),
        }
    }
}

impl<'de> Deserialize<'de> for FieldMapping {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct MappingVisitor;

        impl<'de> Visitor<'de> for MappingVisitor {
            type Value = FieldMapping;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object mapping form field names to CRM property names")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut mapping = FieldMapping::default();
                while let Some((field, property)) = access.next_entry::<String, String>()? {
                    mapping.insert(field, property);
                }
                Ok(mapping)
            }
        }

        deserializer.deserialize_map(MappingVisitor)
    }
}

/// Turns submitted fields into CRM contact properties
pub struct MappingResolver;

impl MappingResolver {
    /// Resolves `fields` against the raw mapping document
    ///
    /// On success the property set is non-empty and contains `email`.
    pub fn resolve(mapping_document: &str, fields: &FieldSet) -> Result<PropertyMap, ResolveError> {
        let mapping = FieldMapping::parse(mapping_document)?;
        Self::resolve_with(&mapping, fields)
    }

    /// Resolves `fields` against an already parsed mapping
    pub fn resolve_with(mapping: &FieldMapping, fields: &FieldSet) -> Result<PropertyMap, ResolveError> {
        if mapping.is_empty() {
            return Err(ResolveError::InvalidMapping);
        }

        let properties = mapping.apply(fields);
        if properties.is_empty() {
            return Err(ResolveError::NoMappableFields);
        }
        if !properties.contains_key(REQUIRED_PROPERTY) {
            return Err(ResolveError::MissingRequiredEmail);
        }
        Ok(properties)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> FieldSet {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_parse_keeps_document_order() {
        let mapping = FieldMapping::parse(r#"{"z": "lastname", "a": "email"}"#).unwrap();
        let entries: Vec<_> = mapping.entries().collect();
        assert_eq!(entries, vec![("z", "lastname"), ("a", "email")]);
    }

    #[test]
    fn test_parse_rejects_wrong_shapes() {
        for doc in ["", "{", "[]", "[\"email\"]", "\"email\"", "null", "42", "{}", r#"{"email": 1}"#, r#"{"email": null}"#] {
            assert_eq!(FieldMapping::parse(doc), Err(ResolveError::InvalidMapping), "document: {doc}");
        }
    }

    #[test]
    fn test_duplicate_key_last_value_wins() {
        let mapping = FieldMapping::parse(r#"{"mail": "email", "mail": "work_email"}"#).unwrap();
        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping.entries().next(), Some(("mail", "work_email")));
    }

    #[test]
    fn test_two_fields_one_property_later_wins() {
        let mapping = FieldMapping::from_pairs([("email", "email"), ("work_email", "email")]);
        let props = mapping.apply(&fields(&[("email", "a@x.com"), ("work_email", "b@y.com")]));
        assert_eq!(props.get("email").map(String::as_str), Some("b@y.com"));
    }

    #[test]
    fn test_resolve_example() {
        let props = MappingResolver::resolve(
            r#"{"name":"firstname","email":"email"}"#,
            &fields(&[("name", "Ann"), ("email", "a@x.com"), ("referrer", "x")]),
        )
        .unwrap();

        assert_eq!(props, fields(&[("firstname", "Ann"), ("email", "a@x.com")]));
    }

    #[test]
    fn test_resolve_error_order() {
        let doc = r#"{"name":"firstname","email":"email"}"#;
        assert_eq!(
            MappingResolver::resolve(doc, &fields(&[("other", "1")])),
            Err(ResolveError::NoMappableFields)
        );
        assert_eq!(
            MappingResolver::resolve(doc, &fields(&[("name", "Ann")])),
            Err(ResolveError::MissingRequiredEmail)
        );
        assert_eq!(
            MappingResolver::resolve("not json", &fields(&[("email", "a@x.com")])),
            Err(ResolveError::InvalidMapping)
        );
    }

    #[test]
    fn test_empty_value_still_counts_as_present() {
        let props = MappingResolver::resolve(r#"{"email":"email"}"#, &fields(&[("email", "")])).unwrap();
        assert_eq!(props.get("email").map(String::as_str), Some(""));
    }
}
