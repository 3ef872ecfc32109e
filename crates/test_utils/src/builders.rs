//! Test Data Builders
//!
//! Builders that let tests name only the fields they care about.

use core_kernel::FormId;
use domain_forms::{FieldSet, Page, SubmissionEvent};

use crate::fixtures::LayoutFixtures;

/// Builder for form submissions as the host delivers them
///
/// ```rust,ignore
/// let event = SubmissionEventBuilder::new(12)
///     .field("email", "a@x.com")
///     .with_metadata()
///     .build();
/// ```
pub struct SubmissionEventBuilder {
    form_id: u64,
    fields: FieldSet,
}

impl SubmissionEventBuilder {
    pub fn new(form_id: u64) -> Self {
        Self {
            form_id,
            fields: FieldSet::new(),
        }
    }

    /// Adds or replaces a submitted field
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Adds the metadata keys the host attaches to every submission
    pub fn with_metadata(self) -> Self {
        let form_id = self.form_id.to_string();
        self.field("form_id", form_id)
            .field("post_id", "42")
            .field("referrer", "https://example.com/contact")
    }

    pub fn build(self) -> SubmissionEvent {
        SubmissionEvent {
            form_id: FormId::new(self.form_id),
            fields: self.fields,
        }
    }
}

/// Builder for published pages
pub struct PageBuilder {
    id: u64,
    title: String,
    layout: Option<String>,
}

impl PageBuilder {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            title: format!("Page {}", id),
            layout: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Uses a raw layout document
    pub fn with_layout(mut self, layout: impl Into<String>) -> Self {
        self.layout = Some(layout.into());
        self
    }

    /// Uses a nested builder layout embedding the given forms
    pub fn with_forms(self, form_ids: &[u64]) -> Self {
        self.with_layout(LayoutFixtures::nested(form_ids))
    }

    pub fn build(self) -> Page {
        Page::new(self.id, self.title, self.layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submission_builder_metadata() {
        let event = SubmissionEventBuilder::new(5)
            .field("email", "a@x.com")
            .with_metadata()
            .build();

        assert_eq!(event.form_id, FormId::new(5));
        assert_eq!(event.fields.get("form_id").map(String::as_str), Some("5"));
        assert_eq!(event.user_fields().len(), 1);
    }

    #[test]
    fn test_page_builder_defaults() {
        let page = PageBuilder::new(3).build();
        assert_eq!(page.title, "Page 3");
        assert!(page.layout.is_none());
    }
}
