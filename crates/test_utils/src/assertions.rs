//! Custom Test Assertions
//!
//! Assertion helpers that print the whole map or check result on failure.

use core_kernel::{AdapterHealth, HealthCheckResult};
use domain_forms::{is_reserved_field, FieldSet, PropertyMap};

/// Asserts that `property` is present with `expected` as its value
pub fn assert_property(properties: &PropertyMap, property: &str, expected: &str) {
    assert_eq!(
        properties.get(property).map(String::as_str),
        Some(expected),
        "Property '{}' mismatch in {:?}",
        property,
        properties
    );
}

/// Asserts that the map has exactly the given property names
pub fn assert_property_names(properties: &PropertyMap, expected: &[&str]) {
    let mut actual: Vec<&str> = properties.keys().map(String::as_str).collect();
    let mut expected = expected.to_vec();
    actual.sort_unstable();
    expected.sort_unstable();
    assert_eq!(actual, expected, "Unexpected property names in {:?}", properties);
}

/// Asserts that no reserved metadata key survived
pub fn assert_no_reserved_fields(fields: &FieldSet) {
    let leaked: Vec<&String> = fields.keys().filter(|name| is_reserved_field(name)).collect();
    assert!(leaked.is_empty(), "Reserved fields present: {:?}", leaked);
}

/// Asserts that a health check reported healthy
pub fn assert_healthy(result: &HealthCheckResult) {
    assert_eq!(
        result.status,
        AdapterHealth::Healthy,
        "Adapter {} unhealthy: {:?}",
        result.adapter_id,
        result.message
    );
}
