//! # tp-core
//!
//! Core types shared across all Thingpedia Cloud crates:
//! - Entity structs for devices, schemas, examples, entities, and strings
//! - Accept-format and category enums, parsed once at the API boundary
//! - Access scope resolution (anonymous / organization / admin)
//! - Device factory descriptors
//! - Locale-to-language helpers

pub mod entities;
pub mod enums;
pub mod errors;
pub mod factory;
pub mod i18n;
pub mod scope;
