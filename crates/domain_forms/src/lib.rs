//! Form Domain
//!
//! Everything about forms that does not involve the CRM:
//! - discovering which forms are embedded in published pages
//! - the submission event delivered by the host form framework
//! - resolving submitted fields into CRM contact properties
//!
//! # Examples
//!
//! ```rust,ignore
//! use domain_forms::{FieldSet, MappingResolver};
//!
//! let mut fields = FieldSet::new();
//! fields.insert("name".into(), "Ann".into());
//! fields.insert("email".into(), "a@x.com".into());
//!
//! let props = MappingResolver::resolve(r#"{"name":"firstname","email":"email"}"#, &fields)?;
//! assert_eq!(props["firstname"], "Ann");
//! ```

pub mod error;
pub mod mapping;
pub mod submission;
pub mod ports;
pub mod extract;
pub mod discovery;

pub use error::ResolveError;
pub use mapping::{FieldMapping, FieldSet, MappingResolver, PropertyMap, REQUIRED_PROPERTY};
pub use submission::{is_reserved_field, SubmissionEvent, RESERVED_FIELDS};
pub use ports::{Page, PagePort};
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::StaticPagePort;
pub use extract::{FormIdExtractor, LayoutFormIdExtractor, PatternFormIdExtractor};
pub use discovery::{build_catalog, form_label, DuplicateFormPolicy, FormCatalogEntry, FormDiscovery};
