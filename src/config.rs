//! Configuration for Process record construction

use crate::identifier::IdPolicy;
use crate::vocab::Namespace;

/// Default base namespace for minted node IRIs
pub const DEFAULT_BASE_PREFIX: &str = "http://example.org/kb/";

/// Default slug prepended to the root node's UUID
pub const DEFAULT_PREFIX_SLUG: &str = "process-";

/// How a Process record names its nodes
///
/// # Example
/// ```
/// use case_gnu_time::config::ProcessConfig;
/// use case_gnu_time::identifier::IdPolicy;
///
/// let config = ProcessConfig::default().with_id_policy(IdPolicy::Deterministic);
/// assert_eq!(config.prefix_slug, "process-");
/// assert!(config.id_policy.is_deterministic());
/// ```
#[derive(Debug, Clone)]
pub struct ProcessConfig {
    /// Namespace all minted IRIs resolve against
    pub namespace: Namespace,
    /// Slug before the root node's UUID, conventionally ending in `-`
    pub prefix_slug: String,
    /// Random or deterministic identifiers
    pub id_policy: IdPolicy,
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            namespace: Namespace::new(DEFAULT_BASE_PREFIX),
            prefix_slug: DEFAULT_PREFIX_SLUG.to_string(),
            id_policy: IdPolicy::Random,
        }
    }
}

impl ProcessConfig {
    pub fn new(namespace: Namespace) -> Self {
        Self {
            namespace,
            ..Self::default()
        }
    }

    pub fn with_prefix_slug(mut self, slug: impl Into<String>) -> Self {
        self.prefix_slug = slug.into();
        self
    }

    pub fn with_id_policy(mut self, policy: IdPolicy) -> Self {
        self.id_policy = policy;
        self
    }
}
