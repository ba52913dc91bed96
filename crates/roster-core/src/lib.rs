//! Core types and trait definitions for the roster person store.
//!
//! This crate is deliberately free of I/O and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod person;
pub mod store;

pub use person::{NewPerson, Person};
pub use store::PersonStore;
