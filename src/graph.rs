//! In-memory triple store
//!
//! Process records only ever append facts, so the sink interface is a single
//! `add`. `Graph` is the concrete store used by the CLI; it keeps insertion
//! order so serialized output is stable across runs.

use crate::vocab::{self, Namespace};

/// Object position of a triple
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    /// Node reference by absolute IRI
    Iri(String),
    /// Typed literal
    Literal { lexical: String, datatype: String },
}

impl Term {
    pub fn iri(iri: impl Into<String>) -> Self {
        Term::Iri(iri.into())
    }

    pub fn typed(lexical: impl Into<String>, datatype: &str) -> Self {
        Term::Literal {
            lexical: lexical.into(),
            datatype: datatype.to_string(),
        }
    }

    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Term::Iri(iri) => Some(iri),
            Term::Literal { .. } => None,
        }
    }

    pub fn lexical(&self) -> Option<&str> {
        match self {
            Term::Literal { lexical, .. } => Some(lexical),
            Term::Iri(_) => None,
        }
    }
}

/// Subject-predicate-object fact
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Triple {
    pub subject: String,
    pub predicate: String,
    pub object: Term,
}

impl Triple {
    pub fn new(subject: impl Into<String>, predicate: impl Into<String>, object: Term) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object,
        }
    }
}

/// Append-only destination for facts
pub trait TripleSink {
    fn add(&mut self, triple: Triple);
}

/// Ordered, duplicate-free set of triples plus prefix bindings for output
#[derive(Debug, Clone, Default)]
pub struct Graph {
    triples: Vec<Triple>,
    prefixes: Vec<(String, String)>,
}

impl Graph {
    /// Create a graph with the `rdf` and `xsd` prefixes bound
    pub fn new() -> Self {
        let mut graph = Self::default();
        graph.bind("rdf", vocab::RDF);
        graph.bind("xsd", vocab::XSD);
        graph
    }

    /// Create a graph with the prefixes a Process record serializes under
    pub fn for_process(base: &Namespace) -> Self {
        let mut graph = Self::new();
        graph.bind("kb", base.as_str());
        graph.bind("uco-core", vocab::UCO_CORE);
        graph.bind("uco-observable", vocab::UCO_OBSERVABLE);
        graph
    }

    /// Bind (or rebind) a prefix to a namespace IRI
    pub fn bind(&mut self, prefix: &str, namespace: &str) {
        if let Some(entry) = self.prefixes.iter_mut().find(|(p, _)| p == prefix) {
            entry.1 = namespace.to_string();
        } else {
            self.prefixes
                .push((prefix.to_string(), namespace.to_string()));
        }
    }

    pub fn prefixes(&self) -> &[(String, String)] {
        &self.prefixes
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    pub fn triples(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    pub fn contains(&self, triple: &Triple) -> bool {
        self.triples.contains(triple)
    }

    /// All objects of `(subject, predicate, ?)`
    pub fn objects<'a>(
        &'a self,
        subject: &'a str,
        predicate: &'a str,
    ) -> impl Iterator<Item = &'a Term> + 'a {
        self.triples
            .iter()
            .filter(move |t| t.subject == subject && t.predicate == predicate)
            .map(|t| &t.object)
    }

    /// All subjects typed as `class`
    pub fn subjects_of_type<'a>(&'a self, class: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.triples
            .iter()
            .filter(move |t| t.predicate == vocab::RDF_TYPE && t.object.as_iri() == Some(class))
            .map(|t| t.subject.as_str())
    }
}

impl TripleSink for Graph {
    fn add(&mut self, triple: Triple) {
        if !self.contains(&triple) {
            self.triples.push(triple);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_triple() -> Triple {
        Triple::new(
            "http://example.org/kb/p1",
            vocab::RDF_TYPE,
            Term::iri(vocab::OBSERVABLE_OBJECT),
        )
    }

    #[test]
    fn test_add_and_len() {
        let mut graph = Graph::new();
        assert!(graph.is_empty());
        graph.add(sample_triple());
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_duplicate_triples_collapse() {
        let mut graph = Graph::new();
        graph.add(sample_triple());
        graph.add(sample_triple());
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_objects_query() {
        let mut graph = Graph::new();
        graph.add(Triple::new(
            "s",
            vocab::EXIT_STATUS,
            Term::typed("0", vocab::XSD_LONG),
        ));
        graph.add(Triple::new(
            "s",
            vocab::EXIT_STATUS,
            Term::typed("1", vocab::XSD_LONG),
        ));
        graph.add(Triple::new(
            "other",
            vocab::EXIT_STATUS,
            Term::typed("2", vocab::XSD_LONG),
        ));

        let values: Vec<_> = graph
            .objects("s", vocab::EXIT_STATUS)
            .filter_map(Term::lexical)
            .collect();
        assert_eq!(values, vec!["0", "1"]);
    }

    #[test]
    fn test_subjects_of_type() {
        let mut graph = Graph::new();
        graph.add(sample_triple());
        let subjects: Vec<_> = graph.subjects_of_type(vocab::OBSERVABLE_OBJECT).collect();
        assert_eq!(subjects, vec!["http://example.org/kb/p1"]);
        assert_eq!(graph.subjects_of_type(vocab::PROCESS_FACET).count(), 0);
    }

    #[test]
    fn test_for_process_binds_prefixes() {
        let graph = Graph::for_process(&Namespace::new("http://example.org/kb/"));
        let prefixes: Vec<_> = graph.prefixes().iter().map(|(p, _)| p.as_str()).collect();
        assert_eq!(prefixes, vec!["rdf", "xsd", "kb", "uco-core", "uco-observable"]);
    }

    #[test]
    fn test_rebind_replaces_namespace() {
        let mut graph = Graph::new();
        graph.bind("kb", "http://a/");
        graph.bind("kb", "http://b/");
        let kb: Vec<_> = graph.prefixes().iter().filter(|(p, _)| p == "kb").collect();
        assert_eq!(kb.len(), 1);
        assert_eq!(kb[0].1, "http://b/");
    }
}
