//! Common test utilities for integration tests

use docroute_core::memory::{ContentFixture, InMemoryContentTree, InMemoryDomainService};
use docroute_core::{ContentKey, DocumentUrlStore, GlobalRoutingConfig};
use docroute_observability::Metrics;
use docroute_routing::{DocumentUrlService, RouteResolver, UrlSegmentProviderCollection};
use std::sync::Arc;

pub const HOME: &str = "6f1c1b7e-0b57-4e8e-9a57-0a3c1f1e2d11";
pub const PRODUCTS: &str = "0d5a8b3e-5d0e-4e0b-8f43-6a1f0a9e3c22";
pub const SHOES: &str = "a3b1c2d4-1111-4e0b-8f43-6a1f0a9e3c33";
pub const ABOUT: &str = "b4c2d3e5-2222-4e0b-8f43-6a1f0a9e3c44";
pub const ARCHIVE: &str = "c5d3e4f6-3333-4e0b-8f43-6a1f0a9e3c55";
pub const OLD: &str = "d6e4f5a7-4444-4e0b-8f43-6a1f0a9e3c66";

/// Two roots; `home` carries a Danish domain.
///
/// ```text
/// home (invariant)
/// ├── products (en-US, da-DK, ar-SA)
/// │   └── shoes (en-US, ar-SA published; da-DK draft only)
/// └── about (invariant, "About Us")
/// archive (invariant)
/// └── old (trashed)
/// ```
pub const SITE_YAML: &str = r#"
nodes:
  - key: 6f1c1b7e-0b57-4e8e-9a57-0a3c1f1e2d11
    id: 1
    name: Home
    published: true
  - key: 0d5a8b3e-5d0e-4e0b-8f43-6a1f0a9e3c22
    id: 2
    parent_id: 1
    culture_names:
      en-us: Products
      da-dk: Produkter
      ar-sa: Muntajat
    published_cultures: [en-us, da-dk, ar-sa]
  - key: a3b1c2d4-1111-4e0b-8f43-6a1f0a9e3c33
    id: 3
    parent_id: 2
    culture_names:
      en-us: Shoes
      da-dk: Sko
      ar-sa: Ahdhiya
    published_cultures: [en-us, ar-sa]
  - key: b4c2d3e5-2222-4e0b-8f43-6a1f0a9e3c44
    id: 4
    parent_id: 1
    sort_order: 1
    name: About Us
    published: true
  - key: c5d3e4f6-3333-4e0b-8f43-6a1f0a9e3c55
    id: 5
    sort_order: 1
    name: Archive
    published: true
  - key: d6e4f5a7-4444-4e0b-8f43-6a1f0a9e3c66
    id: 6
    parent_id: 5
    name: Old
    published: true
    trashed: true
domains:
  - domain_name: example.dk
    root_content_key: 6f1c1b7e-0b57-4e8e-9a57-0a3c1f1e2d11
    language_iso_code: da-DK
"#;

#[allow(dead_code)]
pub fn key(s: &str) -> ContentKey {
    ContentKey::from_string(s).unwrap()
}

pub struct Site {
    pub tree: Arc<InMemoryContentTree>,
    pub domains: Arc<InMemoryDomainService>,
}

pub fn load_site() -> Site {
    let (tree, domains) = ContentFixture::from_yaml_str(SITE_YAML)
        .unwrap()
        .into_collaborators();
    Site {
        tree: Arc::new(tree),
        domains: Arc::new(domains),
    }
}

impl Site {
    pub fn resolver(&self, config: GlobalRoutingConfig) -> RouteResolver {
        RouteResolver::new(
            self.tree.clone(),
            self.tree.clone(),
            self.domains.clone(),
            UrlSegmentProviderCollection::default(),
            config,
        )
    }

    #[allow(dead_code)]
    pub fn service(
        &self,
        config: GlobalRoutingConfig,
        store: Arc<dyn DocumentUrlStore>,
        metrics: Option<Arc<Metrics>>,
    ) -> DocumentUrlService {
        let mut resolver = self.resolver(config);
        if let Some(metrics) = &metrics {
            resolver = resolver.with_metrics(metrics.clone());
        }
        let service = DocumentUrlService::new(Arc::new(resolver), store)
            .with_tree_lock(self.tree.tree_lock());
        match metrics {
            Some(metrics) => service.with_metrics(metrics),
            None => service,
        }
    }
}
