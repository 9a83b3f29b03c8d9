//! Generic list/detail/form presentation engine.
//!
//! Every business module describes its views declaratively — filter
//! descriptors, table headers, field specs, child collections — and this
//! crate turns those descriptions into filtered listings, tabbed detail
//! payloads, and atomic parent+children form saves.

pub mod choice;
pub mod detail;
pub mod filter;
pub mod form;
pub mod list;

pub use choice::{Choice, resolve_candidates, search_candidates};
pub use detail::{Button, Detail, DetailSpec, DetailView, FieldValue, Section, SectionBody, Tab};
pub use filter::{FilterDescriptor, FilterKind, ListQuery, build_query};
pub use form::{
    CollectionSpec, FieldError, FieldKind, FieldSpec, FormInput, FormRejection, FormResult,
    FormSpec, RowInput, ValidationErrors, validate_and_save,
};
pub use list::{Fragment, Header, ListView, Page, render_fragment, render_list};
