//! Form discovery
//!
//! Builds the catalog of forms embedded in published pages. The catalog is
//! recomputed on every request and never stored.
//!
//! A form embedded on several pages is reported once. Which page names it is
//! decided by [`DuplicateFormPolicy`]; the default keeps the last page
//! scanned, so the label depends on the host's page order. Catalog order is
//! the order in which each form id was first seen.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use core_kernel::{CoreError, FormId};

use crate::extract::FormIdExtractor;
use crate::ports::{Page, PagePort};

/// How a form found on several pages is labelled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateFormPolicy {
    /// The last page scanned names the form
    #[default]
    LastPageWins,
    /// The first page scanned names the form
    FirstPageWins,
    /// Every page is listed in the label
    AggregatePages,
}

impl DuplicateFormPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            DuplicateFormPolicy::LastPageWins => "last_page_wins",
            DuplicateFormPolicy::FirstPageWins => "first_page_wins",
            DuplicateFormPolicy::AggregatePages => "aggregate_pages",
        }
    }
}

impl fmt::Display for DuplicateFormPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DuplicateFormPolicy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "last_page_wins" => Ok(DuplicateFormPolicy::LastPageWins),
            "first_page_wins" => Ok(DuplicateFormPolicy::FirstPageWins),
            "aggregate_pages" => Ok(DuplicateFormPolicy::AggregatePages),
            other => Err(CoreError::configuration(format!("unknown duplicate form policy: {other}"))),
        }
    }
}

/// One discovered form, as offered in the settings screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormCatalogEntry {
    pub form_id: FormId,
    pub label: String,
}

/// Label for a form found on a single page
pub fn form_label(form_id: FormId, page_title: &str) -> String {
    format!("Form #{form_id} (Page: {page_title})")
}

fn aggregate_label(form_id: FormId, page_titles: &[&str]) -> String {
    format!("Form #{form_id} (Pages: {})", page_titles.join(", "))
}

/// Builds the catalog from pages, using `extractor` to find each page's forms
pub fn build_catalog(
    pages: &[Page],
    extractor: &dyn FormIdExtractor,
    policy: DuplicateFormPolicy,
) -> Vec<FormCatalogEntry> {
    // (form id, titles of the pages it appears on), in first-seen order
    let mut found: Vec<(FormId, Vec<&str>)> = Vec::new();

    for page in pages {
        for form_id in extractor.list_embedded_form_ids(page) {
            match found.iter_mut().find(|(id, _)| *id == form_id) {
                Some((_, titles)) => titles.push(page.title.as_str()),
                None => found.push((form_id, vec![page.title.as_str()])),
            }
        }
    }

    found
        .into_iter()
        .filter_map(|(form_id, titles)| {
            let label = match policy {
                DuplicateFormPolicy::LastPageWins => form_label(form_id, titles.last()?),
                DuplicateFormPolicy::FirstPageWins => form_label(form_id, titles.first()?),
                DuplicateFormPolicy::AggregatePages if titles.len() > 1 => {
                    aggregate_label(form_id, &titles)
                }
                DuplicateFormPolicy::AggregatePages => form_label(form_id, titles.first()?),
            };
            Some(FormCatalogEntry { form_id, label })
        })
        .collect()
}

/// Lists the forms embedded in the host's published pages
#[derive(Clone)]
pub struct FormDiscovery {
    pages: Arc<dyn PagePort>,
    extractor: Arc<dyn FormIdExtractor>,
    policy: DuplicateFormPolicy,
}

impl fmt::Debug for FormDiscovery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormDiscovery")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl FormDiscovery {
    pub fn new(pages: Arc<dyn PagePort>, extractor: Arc<dyn FormIdExtractor>) -> Self {
        Self {
            pages,
            extractor,
            policy: DuplicateFormPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: DuplicateFormPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> DuplicateFormPolicy {
        self.policy
    }

    /// Current form catalog
    ///
    /// Never fails: an unreachable content store yields an empty catalog.
    #[instrument(skip(self), fields(policy = %self.policy))]
    pub async fn list_forms(&self) -> Vec<FormCatalogEntry> {
        let pages = match self.pages.published_pages().await {
            Ok(pages) => pages,
            Err(e) => {
                warn!(error = %e, "Could not enumerate published pages");
                return Vec::new();
            }
        };

        let catalog = build_catalog(&pages, self.extractor.as_ref(), self.policy);
        debug!(pages = pages.len(), forms = catalog.len(), "Form catalog built");
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::LayoutFormIdExtractor;

    fn page(id: u64, title: &str, form_ids: &[u64]) -> Page {
        let elements: Vec<String> = form_ids.iter().map(|f| format!(r#"{{"formId":{f}}}"#)).collect();
        Page::new(id, title, Some(format!("[{}]", elements.join(","))))
    }

    #[test]
    fn test_single_page_label() {
        let catalog = build_catalog(
            &[page(1, "Contact", &[7])],
            &LayoutFormIdExtractor,
            DuplicateFormPolicy::default(),
        );
        assert_eq!(
            catalog,
            vec![FormCatalogEntry {
                form_id: FormId::new(7),
                label: "Form #7 (Page: Contact)".to_string(),
            }]
        );
    }

    #[test]
    fn test_duplicate_policies() {
        let pages = [page(1, "Home", &[3]), page(2, "About", &[3])];
        let label = |policy| build_catalog(&pages, &LayoutFormIdExtractor, policy)[0].label.clone();

        assert_eq!(label(DuplicateFormPolicy::LastPageWins), "Form #3 (Page: About)");
        assert_eq!(label(DuplicateFormPolicy::FirstPageWins), "Form #3 (Page: Home)");
        assert_eq!(label(DuplicateFormPolicy::AggregatePages), "Form #3 (Pages: Home, About)");
    }

    #[test]
    fn test_catalog_keeps_first_seen_order() {
        let pages = [page(1, "A", &[9]), page(2, "B", &[2, 9])];
        let ids: Vec<u64> = build_catalog(&pages, &LayoutFormIdExtractor, DuplicateFormPolicy::default())
            .into_iter()
            .map(|e| e.form_id.value())
            .collect();
        assert_eq!(ids, vec![9, 2]);
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!(
            "aggregate_pages".parse::<DuplicateFormPolicy>().unwrap(),
            DuplicateFormPolicy::AggregatePages
        );
        assert_eq!(
            " First_Page_Wins ".parse::<DuplicateFormPolicy>().unwrap(),
            DuplicateFormPolicy::FirstPageWins
        );
        assert!(matches!(
            "random".parse::<DuplicateFormPolicy>(),
            Err(CoreError::Configuration(_))
        ));
    }
}
