//! End-to-end integration tests for DocRoute
//!
//! The scenarios under `tests/` wire a content tree fixture, the route
//! resolver, the URL service and a real SQLite store together.
