//! Node identifier minting
//!
//! Identifiers are `namespace + slug + UUID`. The policy is fixed when a
//! record is created:
//!
//! - `Random`: every node gets a fresh UUIDv4.
//! - `Deterministic`: facet identifiers are UUIDv5 values derived from the
//!   owning node's IRI and the facet class, so identical root identifiers
//!   always yield identical facet identifiers. Root identifiers may also be
//!   derived from record content via [`content_uuid`].

use crate::vocab::{self, Namespace};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Identifier generation strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdPolicy {
    #[default]
    Random,
    Deterministic,
}

impl IdPolicy {
    pub fn is_deterministic(self) -> bool {
        matches!(self, IdPolicy::Deterministic)
    }
}

/// Mints IRIs for one record under one namespace and policy
#[derive(Debug, Clone)]
pub struct IdMinter {
    namespace: Namespace,
    policy: IdPolicy,
}

impl IdMinter {
    pub fn new(namespace: Namespace, policy: IdPolicy) -> Self {
        Self { namespace, policy }
    }

    /// IRI for a primary node; a fresh UUIDv4 is used when `uuid` is `None`
    pub fn node_iri(&self, prefix_slug: &str, uuid: Option<Uuid>) -> String {
        let uuid = uuid.unwrap_or_else(Uuid::new_v4);
        self.namespace.term(&format!("{}{}", prefix_slug, uuid))
    }

    /// IRI for the facet of class `facet_class` attached to `owner_iri`
    pub fn facet_iri(&self, owner_iri: &str, facet_class: &str) -> String {
        let uuid = match self.policy {
            IdPolicy::Random => Uuid::new_v4(),
            IdPolicy::Deterministic => {
                Uuid::new_v5(&inherence_uuid(owner_iri), facet_class.as_bytes())
            }
        };
        self.namespace
            .term(&format!("{}-{}", vocab::local_name(facet_class), uuid))
    }
}

/// UUID namespace for things inhering in `owner_iri`.
///
/// Reuses the trailing UUID of the owner's IRI when it has one, so the
/// derivation survives a change of base namespace.
pub fn inherence_uuid(owner_iri: &str) -> Uuid {
    owner_iri
        .len()
        .checked_sub(36)
        .and_then(|start| owner_iri.get(start..))
        .and_then(|tail| Uuid::parse_str(tail).ok())
        .unwrap_or_else(|| Uuid::new_v5(&Uuid::NAMESPACE_URL, owner_iri.as_bytes()))
}

/// Content-derived UUID for a primary node.
///
/// Hashes `content` with SHA-256 and names the digest (prefixed by the slug)
/// inside a UUIDv5 namespace derived from the base namespace IRI.
pub fn content_uuid(namespace: &Namespace, prefix_slug: &str, content: &[u8]) -> Uuid {
    let digest = hex::encode(Sha256::digest(content));
    let ns_uuid = Uuid::new_v5(&Uuid::NAMESPACE_URL, namespace.as_str().as_bytes());
    Uuid::new_v5(&ns_uuid, format!("{}{}", prefix_slug, digest).as_bytes())
}
