//! Requirements catalog: the versioned specification of required data-model
//! elements per device type.
//!
//! The catalog file is a JSON array of device-type requirements. Loading
//! canonicalizes every id and rejects structural problems (missing fields,
//! duplicate ids) with a fatal [`CatalogError`] — a catalog that cannot be
//! trusted is never used for validation. Once loaded, a [`Catalog`] is
//! immutable for the lifetime of a run.

pub mod catalog;
pub mod schema;

pub use catalog::{Catalog, CatalogError};
pub use schema::{
    ClusterRequirement, ClusterSide, DeviceTypeRequirement, ElementRequirement,
};
