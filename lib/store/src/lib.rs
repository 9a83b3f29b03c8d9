pub mod schema;
pub mod spec;
pub mod store;

pub use spec::{ColumnKind, ColumnSpec, OnDelete, ReferenceSpec, Registry, ResourceSpec};
pub use store::{ChildWrite, CollectionWrite, EntityStore, OrderBy, Predicate};
