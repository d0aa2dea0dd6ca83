//! RDF output formats
//!
//! Three concrete syntaxes are written: N-Triples (one fact per line, no
//! prefixes), Turtle (subjects grouped, IRIs compacted against the graph's
//! prefix bindings) and JSON-LD (flattened `@graph` with a prefix `@context`).

use crate::error::{GnuTimeError, Result};
use crate::graph::{Graph, Term, Triple};
use crate::vocab;
use clap::ValueEnum;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Serialization syntax for the output graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RdfFormat {
    /// Turtle (.ttl)
    #[value(alias = "ttl")]
    Turtle,
    /// N-Triples (.nt)
    #[value(alias = "ntriples")]
    Nt,
    /// JSON-LD (.json, .jsonld)
    #[value(name = "json-ld", alias = "jsonld")]
    JsonLd,
}

impl RdfFormat {
    /// Guess the format from a file name's extension
    pub fn guess(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "ttl" | "turtle" | "n3" => Some(RdfFormat::Turtle),
            "nt" => Some(RdfFormat::Nt),
            "json" | "jsonld" => Some(RdfFormat::JsonLd),
            _ => None,
        }
    }

    /// Explicit choice if given, else guessed from `path`
    pub fn resolve(explicit: Option<Self>, path: &Path) -> Result<Self> {
        explicit
            .or_else(|| Self::guess(path))
            .ok_or_else(|| GnuTimeError::UnknownFormat(path.display().to_string()))
    }
}

impl fmt::Display for RdfFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RdfFormat::Turtle => "turtle",
            RdfFormat::Nt => "nt",
            RdfFormat::JsonLd => "json-ld",
        };
        f.write_str(name)
    }
}

impl Graph {
    /// Write the graph to `writer` in `format`
    pub fn serialize<W: Write>(&self, mut writer: W, format: RdfFormat) -> std::io::Result<()> {
        match format {
            RdfFormat::Nt => write_ntriples(self, &mut writer)?,
            RdfFormat::Turtle => write_turtle(self, &mut writer)?,
            RdfFormat::JsonLd => write_jsonld(self, &mut writer)?,
        }
        writer.flush()
    }

    /// Create (or truncate) `path` and write the graph into it
    pub fn serialize_to_path(&self, path: &Path, format: RdfFormat) -> Result<()> {
        let file = File::create(path).map_err(|e| GnuTimeError::io(path, e))?;
        self.serialize(BufWriter::new(file), format)
            .map_err(|e| GnuTimeError::io(path, e))
    }
}

fn escape_literal(lexical: &str) -> String {
    let mut out = String::with_capacity(lexical.len());
    for c in lexical.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}

fn write_ntriples<W: Write>(graph: &Graph, w: &mut W) -> std::io::Result<()> {
    for Triple {
        subject,
        predicate,
        object,
    } in graph.triples()
    {
        let object = match object {
            Term::Iri(iri) => format!("<{}>", iri),
            Term::Literal { lexical, datatype } => {
                format!("\"{}\"^^<{}>", escape_literal(lexical), datatype)
            }
        };
        writeln!(w, "<{}> <{}> {} .", subject, predicate, object)?;
    }
    Ok(())
}

/// Prefix-compacts IRIs for Turtle and JSON-LD output
struct Compactor<'g> {
    prefixes: &'g [(String, String)],
}

impl<'g> Compactor<'g> {
    fn new(graph: &'g Graph) -> Self {
        Self {
            prefixes: graph.prefixes(),
        }
    }

    /// `prefix:local` when a binding covers `iri` with a safe local name
    fn compact(&self, iri: &str) -> Option<String> {
        self.prefixes
            .iter()
            .filter_map(|(prefix, ns)| {
                let local = iri.strip_prefix(ns.as_str())?;
                is_safe_local(local).then(|| (ns.len(), format!("{}:{}", prefix, local)))
            })
            .max_by_key(|(len, _)| *len)
            .map(|(_, curie)| curie)
    }

    fn turtle_iri(&self, iri: &str) -> String {
        self.compact(iri).unwrap_or_else(|| format!("<{}>", iri))
    }

    fn jsonld_iri(&self, iri: &str) -> String {
        self.compact(iri).unwrap_or_else(|| iri.to_string())
    }
}

fn is_safe_local(local: &str) -> bool {
    !local.is_empty()
        && !local.ends_with('.')
        && !local.starts_with(['-', '.'])
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

/// Triples grouped by subject, then predicate, both in first-seen order
fn grouped(graph: &Graph) -> Vec<(&str, Vec<(&str, Vec<&Term>)>)> {
    let mut groups: Vec<(&str, Vec<(&str, Vec<&Term>)>)> = Vec::new();
    for triple in graph.triples() {
        let idx = match groups.iter().position(|(s, _)| *s == triple.subject) {
            Some(idx) => idx,
            None => {
                groups.push((triple.subject.as_str(), Vec::new()));
                groups.len() - 1
            }
        };
        let predicates = &mut groups[idx].1;
        match predicates.iter_mut().find(|(p, _)| *p == triple.predicate) {
            Some((_, objects)) => objects.push(&triple.object),
            None => predicates.push((triple.predicate.as_str(), vec![&triple.object])),
        }
    }
    groups
}

fn write_turtle<W: Write>(graph: &Graph, w: &mut W) -> std::io::Result<()> {
    let compactor = Compactor::new(graph);

    for (prefix, ns) in graph.prefixes() {
        writeln!(w, "@prefix {}: <{}> .", prefix, ns)?;
    }

    for (subject, predicates) in grouped(graph) {
        writeln!(w)?;
        writeln!(w, "{}", compactor.turtle_iri(subject))?;
        for (predicate, objects) in predicates {
            let predicate = if predicate == vocab::RDF_TYPE {
                "a".to_string()
            } else {
                compactor.turtle_iri(predicate)
            };
            let objects: Vec<String> = objects
                .into_iter()
                .map(|object| match object {
                    Term::Iri(iri) => compactor.turtle_iri(iri),
                    Term::Literal { lexical, datatype } => format!(
                        "\"{}\"^^{}",
                        escape_literal(lexical),
                        compactor.turtle_iri(datatype)
                    ),
                })
                .collect();
            writeln!(w, "\t{} {} ;", predicate, objects.join(" , "))?;
        }
        writeln!(w, "\t.")?;
    }
    Ok(())
}

#[derive(Serialize)]
struct JsonLdDocument {
    #[serde(rename = "@context")]
    context: BTreeMap<String, String>,
    #[serde(rename = "@graph")]
    graph: Vec<Value>,
}

fn write_jsonld<W: Write>(graph: &Graph, w: &mut W) -> std::io::Result<()> {
    let compactor = Compactor::new(graph);

    let nodes = grouped(graph)
        .into_iter()
        .map(|(subject, predicates)| {
            let mut node = Map::new();
            node.insert("@id".to_string(), json!(compactor.jsonld_iri(subject)));
            for (predicate, objects) in predicates {
                if predicate == vocab::RDF_TYPE {
                    let types: Vec<String> = objects
                        .into_iter()
                        .filter_map(Term::as_iri)
                        .map(|iri| compactor.jsonld_iri(iri))
                        .collect();
                    node.insert("@type".to_string(), json!(types));
                    continue;
                }
                let values: Vec<Value> = objects
                    .into_iter()
                    .map(|object| match object {
                        Term::Iri(iri) => json!({ "@id": compactor.jsonld_iri(iri) }),
                        Term::Literal { lexical, datatype } => json!({
                            "@type": compactor.jsonld_iri(datatype),
                            "@value": lexical,
                        }),
                    })
                    .collect();
                node.insert(compactor.jsonld_iri(predicate), Value::Array(values));
            }
            Value::Object(node)
        })
        .collect();

    let document = JsonLdDocument {
        context: graph.prefixes().iter().cloned().collect(),
        graph: nodes,
    };
    serde_json::to_writer_pretty(&mut *w, &document)?;
    writeln!(w)
}
