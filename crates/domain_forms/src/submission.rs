//! Form submission events

use serde::{Deserialize, Serialize};

use core_kernel::FormId;

use crate::mapping::FieldSet;

/// Keys the host adds to every submission; they are metadata, not user input
pub const RESERVED_FIELDS: [&str; 3] = ["form_id", "post_id", "referrer"];

/// Returns true for submission metadata keys
pub fn is_reserved_field(name: &str) -> bool {
    RESERVED_FIELDS.contains(&name)
}

/// A filled-out form, as delivered by the host form framework
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionEvent {
    pub form_id: FormId,
    pub fields: FieldSet,
}

impl SubmissionEvent {
    /// Creates an event from raw field pairs
    pub fn new<I, K, V>(form_id: FormId, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            form_id,
            fields: fields.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    /// Submitted fields with the reserved metadata keys removed
    pub fn user_fields(&self) -> FieldSet {
        self.fields
            .iter()
            .filter(|(name, _)| !is_reserved_field(name))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }
}
