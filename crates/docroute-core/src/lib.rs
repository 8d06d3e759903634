//! DocRoute Core Types and Traits
//!
//! This crate provides the fundamental types and traits used throughout DocRoute:
//! - Content tree snapshots, domain bindings, routes and URL entries
//! - Collaborator traits (content repository, id/key map, domains, URL store)
//! - Routing configuration
//! - Core error types
//! - In-memory collaborators for tests and fixture-driven runs

pub mod config;
pub mod config_store;
pub mod content;
pub mod culture;
pub mod domain;
pub mod error;
pub mod memory;
pub mod repository;
pub mod route;
pub mod url_store;

pub use config::{GlobalRoutingConfig, SlugConfig, SlugMode, SlugSeparator};
pub use config_store::ConfigStore;
pub use content::{ContentKey, ContentNode, ContentTreeLock, ObjectType, ROOT_PARENT_ID};
pub use domain::DomainBinding;
pub use error::{Error, Result};
pub use repository::{ContentRepository, DomainService, IdKeyMap};
pub use route::{Route, UrlEntry, UrlEntryKey};
pub use url_store::DocumentUrlStore;
