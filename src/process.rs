//! UCO Process records
//!
//! A [`ProcessRecord`] owns one `uco-observable:ObservableObject` node and,
//! once any process field is written, one attached `uco-observable:ProcessFacet`.
//! Facts go straight into the borrowed [`TripleSink`]; nothing is buffered.
//!
//! `created_time` and `exit_time` are write-once. `exit_status` is not: every
//! call appends another `exitStatus` fact.

use crate::config::ProcessConfig;
use crate::error::{GnuTimeError, Result};
use crate::gnu_time::TimeLog;
use crate::graph::{Term, Triple, TripleSink};
use crate::identifier::IdMinter;
use crate::timestamp::Timestamp;
use crate::vocab;
use std::path::Path;
use tracing::debug;
use uuid::Uuid;

/// State of a write-once field
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum WriteOnce<T> {
    #[default]
    Unset,
    Set(T),
}

impl<T> WriteOnce<T> {
    pub fn get(&self) -> Option<&T> {
        match self {
            WriteOnce::Unset => None,
            WriteOnce::Set(value) => Some(value),
        }
    }

    pub fn is_set(&self) -> bool {
        matches!(self, WriteOnce::Set(_))
    }

    fn ensure_unset(&self, field: &'static str) -> Result<()> {
        if self.is_set() {
            return Err(GnuTimeError::AlreadySet(field));
        }
        Ok(())
    }
}

/// Time value as given (the literal's lexical form) plus its parsed instant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeField {
    pub lexical: String,
    pub timestamp: Timestamp,
}

/// Builder for one Process node in a triple sink
#[derive(Debug)]
pub struct ProcessRecord<'a, S: TripleSink> {
    sink: &'a mut S,
    minter: IdMinter,
    node: String,
    facet: Option<String>,
    created_time: WriteOnce<TimeField>,
    exit_time: WriteOnce<TimeField>,
    exit_status: Option<i64>,
}

impl<'a, S: TripleSink> ProcessRecord<'a, S> {
    /// Create the root node with a fresh random UUID.
    ///
    /// Adds exactly one triple: the node's `rdf:type`.
    pub fn new(sink: &'a mut S, config: &ProcessConfig) -> Self {
        Self::with_node_uuid(sink, config, None)
    }

    /// Create the root node, naming it with `uuid` when given
    pub fn with_node_uuid(sink: &'a mut S, config: &ProcessConfig, uuid: Option<Uuid>) -> Self {
        let minter = IdMinter::new(config.namespace.clone(), config.id_policy);
        let node = minter.node_iri(&config.prefix_slug, uuid);
        sink.add(Triple::new(
            node.as_str(),
            vocab::RDF_TYPE,
            Term::iri(vocab::OBSERVABLE_OBJECT),
        ));
        debug!(node = %node, policy = ?config.id_policy, "created process node");

        Self {
            sink,
            minter,
            node,
            facet: None,
            created_time: WriteOnce::Unset,
            exit_time: WriteOnce::Unset,
            exit_status: None,
        }
    }

    /// IRI of the root node
    pub fn node(&self) -> &str {
        &self.node
    }

    /// IRI of the ProcessFacet, if it has been materialized
    pub fn facet_if_present(&self) -> Option<&str> {
        self.facet.as_deref()
    }

    /// IRI of the ProcessFacet, creating it (type + `hasFacet` link) on first call
    pub fn facet(&mut self) -> &str {
        let facet = match self.facet.take() {
            Some(facet) => facet,
            None => {
                let facet = self.minter.facet_iri(&self.node, vocab::PROCESS_FACET);
                self.sink.add(Triple::new(
                    facet.as_str(),
                    vocab::RDF_TYPE,
                    Term::iri(vocab::PROCESS_FACET),
                ));
                self.sink.add(Triple::new(
                    self.node.as_str(),
                    vocab::CORE_HAS_FACET,
                    Term::iri(facet.as_str()),
                ));
                debug!(facet = %facet, "created process facet");
                facet
            }
        };
        self.facet.insert(facet)
    }

    pub fn created_time(&self) -> Option<&str> {
        self.created_time.get().map(|f| f.lexical.as_str())
    }

    pub fn exit_time(&self) -> Option<&str> {
        self.exit_time.get().map(|f| f.lexical.as_str())
    }

    /// Parsed exit time, for arithmetic
    pub fn exit_timestamp(&self) -> Option<Timestamp> {
        self.exit_time.get().map(|f| f.timestamp)
    }

    /// Most recently set exit status
    pub fn exit_status(&self) -> Option<i64> {
        self.exit_status
    }

    /// Set `observableCreatedTime` once; `value` must be ISO-8601
    pub fn set_created_time(&mut self, value: &str) -> Result<()> {
        self.created_time.ensure_unset("created_time")?;
        let field = self.time_fact(value, vocab::OBSERVABLE_CREATED_TIME)?;
        self.created_time = WriteOnce::Set(field);
        Ok(())
    }

    /// Set `exitTime` once; `value` must be ISO-8601
    pub fn set_exit_time(&mut self, value: &str) -> Result<()> {
        self.exit_time.ensure_unset("exit_time")?;
        let field = self.time_fact(value, vocab::EXIT_TIME)?;
        self.exit_time = WriteOnce::Set(field);
        Ok(())
    }

    /// Append an `exitStatus` fact. May be called repeatedly.
    pub fn set_exit_status(&mut self, value: i64) {
        let facet = self.facet().to_string();
        self.sink.add(Triple::new(
            facet,
            vocab::EXIT_STATUS,
            Term::typed(value.to_string(), vocab::XSD_LONG),
        ));
        self.exit_status = Some(value);
    }

    /// Validate `value`, then record it on the facet as an `xsd:dateTime`
    fn time_fact(&mut self, value: &str, predicate: &str) -> Result<TimeField> {
        let timestamp = Timestamp::parse(value)?;
        let facet = self.facet().to_string();
        self.sink.add(Triple::new(
            facet,
            predicate,
            Term::typed(value, vocab::XSD_DATETIME),
        ));
        Ok(TimeField {
            lexical: value.to_string(),
            timestamp,
        })
    }

    /// Fill exit status and created time from a GNU Time `--verbose` log.
    ///
    /// If no exit time has been set, it is taken from the log file's
    /// modification time (UTC). The created time is the exit time minus the
    /// log's elapsed wall clock time.
    pub fn populate_from_gnu_time_log(&mut self, log_path: impl AsRef<Path>) -> Result<()> {
        let log_path = log_path.as_ref();

        let exit_time = match self.exit_timestamp() {
            Some(ts) => ts,
            None => {
                let modified = std::fs::metadata(log_path)
                    .and_then(|meta| meta.modified())
                    .map_err(|e| GnuTimeError::io(log_path, e))?;
                let ts = Timestamp::from_system_time(modified);
                debug!(exit_time = %ts, "exit time taken from log modification time");
                self.set_exit_time(&ts.isoformat())?;
                ts
            }
        };

        let log = TimeLog::from_file(log_path)?;
        self.set_exit_status(log.exit_status()?);

        let elapsed = log.elapsed()?;
        debug!(elapsed = ?elapsed, "parsed elapsed wall clock time");
        let created = exit_time.checked_sub(elapsed.to_duration()?)?;
        debug!(created_time = %created, exit_time = %exit_time, "derived created time");
        self.set_created_time(&created.isoformat())
    }
}
