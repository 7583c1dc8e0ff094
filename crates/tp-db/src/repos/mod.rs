//! Repository functions for the Thingpedia catalog.
//!
//! Every function takes an explicit `&libsql::Connection` as its first
//! argument; visibility filtering takes an [`AccessScope`](tp_core::scope::AccessScope)
//! where the query depends on the caller.

pub mod device;
pub mod entity;
pub mod example;
pub mod organization;
pub mod schema;
pub mod strings;
