//! Module containing concrete implementations from the [core](crate::core) module.

/// Document storage implementations.
pub mod document;

/// Repository implementations.
pub mod repo;

/// Concrete service types.
pub mod service;

/// Application state configuration.
pub mod state;

/// HTTP server implementation.
pub mod server;

#[cfg(all(test, feature = "integration-tests"))]
pub mod test;
