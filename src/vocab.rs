//! IRI namespaces and the UCO terms used by Process records

use crate::error::{GnuTimeError, Result};
use std::fmt;
use std::str::FromStr;

/// Base IRI under which local names are resolved
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Namespace(String);

impl Namespace {
    /// Wrap `base` without checking it; see [`Namespace::parse`]
    pub fn new(base: impl Into<String>) -> Self {
        Self(base.into())
    }

    /// Wrap `base`, rejecting text that cannot sit inside `<...>` in
    /// N-Triples or Turtle output
    pub fn parse(base: &str) -> Result<Self> {
        let invalid = |reason: String| GnuTimeError::InvalidNamespace {
            value: base.to_string(),
            reason,
        };
        if base.is_empty() {
            return Err(invalid("empty IRI".to_string()));
        }
        if let Some(c) = base.chars().find(|c| is_forbidden_in_iri(*c)) {
            return Err(invalid(format!("character {:?} is not allowed", c)));
        }
        if !base.contains(':') {
            return Err(invalid("missing scheme".to_string()));
        }
        Ok(Self(base.to_string()))
    }

    /// Resolve a local name against this namespace
    pub fn term(&self, local: &str) -> String {
        format!("{}{}", self.0, local)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Namespace {
    type Err = GnuTimeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Characters excluded from an N-Triples `IRIREF`
fn is_forbidden_in_iri(c: char) -> bool {
    c <= ' ' || matches!(c, '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\')
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";
pub const UCO_CORE: &str = "https://unifiedcyberontology.org/ontology/uco/core#";
pub const UCO_OBSERVABLE: &str = "https://unifiedcyberontology.org/ontology/uco/observable#";

pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

pub const XSD_DATETIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";
pub const XSD_LONG: &str = "http://www.w3.org/2001/XMLSchema#long";

pub const CORE_HAS_FACET: &str = "https://unifiedcyberontology.org/ontology/uco/core#hasFacet";

pub const OBSERVABLE_OBJECT: &str =
    "https://unifiedcyberontology.org/ontology/uco/observable#ObservableObject";
pub const PROCESS_FACET: &str =
    "https://unifiedcyberontology.org/ontology/uco/observable#ProcessFacet";
pub const OBSERVABLE_CREATED_TIME: &str =
    "https://unifiedcyberontology.org/ontology/uco/observable#observableCreatedTime";
pub const EXIT_TIME: &str = "https://unifiedcyberontology.org/ontology/uco/observable#exitTime";
pub const EXIT_STATUS: &str =
    "https://unifiedcyberontology.org/ontology/uco/observable#exitStatus";

/// Local name of a class IRI (text after the last `#` or `/`)
pub fn local_name(iri: &str) -> &str {
    iri.rsplit(['#', '/']).next().unwrap_or(iri)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespace_term() {
        let ns = Namespace::new("http://example.org/kb/");
        assert_eq!(ns.term("process-1"), "http://example.org/kb/process-1");
    }

    #[test]
    fn test_namespace_parse_accepts_iris() {
        for base in ["http://example.org/kb/", "urn:example:", "https://x.test/a#"] {
            assert_eq!(Namespace::parse(base).unwrap().as_str(), base);
        }
    }

    #[test]
    fn test_namespace_parse_rejects_unsafe_iris() {
        for bad in [
            "",
            "http://example.org/my kb/",
            "http://example.org/kb>/",
            "http://example.org/<kb>/",
            "http://example.org/\"kb\"/",
            "http://example.org/kb\n",
            "relative/path/",
        ] {
            let err = bad.parse::<Namespace>().unwrap_err();
            assert!(
                matches!(err, GnuTimeError::InvalidNamespace { .. }),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_vocabulary_terms_share_namespace() {
        assert!(PROCESS_FACET.starts_with(UCO_OBSERVABLE));
        assert!(EXIT_STATUS.starts_with(UCO_OBSERVABLE));
        assert!(CORE_HAS_FACET.starts_with(UCO_CORE));
        assert!(RDF_TYPE.starts_with(RDF));
        assert!(XSD_LONG.starts_with(XSD));
    }

    #[test]
    fn test_local_name() {
        assert_eq!(local_name(PROCESS_FACET), "ProcessFacet");
        assert_eq!(local_name("http://example.org/kb/thing"), "thing");
        assert_eq!(local_name("plain"), "plain");
    }
}
