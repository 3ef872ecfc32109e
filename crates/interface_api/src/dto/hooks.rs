//! Inbound submission hook DTOs

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use core_kernel::FormId;
use domain_forms::SubmissionEvent;

/// Separator for multi-value fields, as the CRM expects for multi-select properties
pub const MULTI_VALUE_SEPARATOR: &str = ";";

/// A submission delivered by the host form framework
#[derive(Debug, Deserialize, Validate)]
pub struct FormSubmittedRequest {
    #[validate(range(min = 1))]
    pub form_id: u64,
    #[serde(default)]
    pub form_data: Map<String, Value>,
}

impl FormSubmittedRequest {
    /// Flattens the posted values to strings
    ///
    /// A `null` value counts as not submitted, so the field is left out.
    pub fn into_event(self) -> SubmissionEvent {
        SubmissionEvent::new(
            FormId::new(self.form_id),
            self.form_data
                .into_iter()
                .filter_map(|(name, value)| field_value(value).map(|v| (name, v))),
        )
    }
}

fn field_value(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Array(items) => Some(
            items
                .into_iter()
                .filter_map(field_value)
                .collect::<Vec<_>>()
                .join(MULTI_VALUE_SEPARATOR),
        ),
        other => Some(other.to_string()),
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AcceptedResponse {
    pub accepted: bool,
    pub form_id: FormId,
}
