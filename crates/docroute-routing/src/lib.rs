//! DocRoute Routing Engine
//!
//! This crate provides the routing logic for DocRoute:
//! - Route resolution by ascending the content tree
//! - Domain lookup and top-level segment hiding
//! - Pluggable URL segment providers
//! - Document URL service (bulk rebuild, freshness check, entry maintenance)

pub mod ascent;
pub mod domain;
pub mod hide_top_level;
pub mod resolver;
pub mod segment;
pub mod service;
pub mod slug;

// Re-export commonly used types
pub use ascent::SegmentTrail;
pub use domain::DomainLookup;
pub use hide_top_level::TopLevelHider;
pub use resolver::RouteResolver;
pub use segment::{
    ContentTypeSegmentProvider, DefaultUrlSegmentProvider, UrlSegmentProvider,
    UrlSegmentProviderCollection,
};
pub use service::{DocumentUrlService, ROUTING_FINGERPRINT_KEY, RebuildFailure, RebuildStats};
pub use slug::to_url_segment;
