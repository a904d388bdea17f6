//! The core module defines the business logic of the catalog.
//! It provides the traits and models upstream adapters need to implement.

pub mod document;
pub mod model;
pub mod repo;
pub mod service;
