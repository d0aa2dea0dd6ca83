//! End-to-end conversion: GNU Time log (+ optional done-log) to an RDF file

use crate::config::ProcessConfig;
use crate::error::{GnuTimeError, Result};
use crate::graph::{Graph, TripleSink};
use crate::identifier;
use crate::process::ProcessRecord;
use crate::serialize::RdfFormat;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Only the head of a done-log is read; it holds a single timestamp.
pub const DONE_LOG_READ_LIMIT: u64 = 64;

/// Read the completion timestamp recorded in a done-log
pub fn read_done_log<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| GnuTimeError::io(path, e))?;
    let mut head = String::new();
    file.take(DONE_LOG_READ_LIMIT)
        .read_to_string(&mut head)
        .map_err(|e| GnuTimeError::io(path, e))?;
    Ok(head.trim().to_string())
}

/// Build a Process node from a GNU Time `--verbose` log.
///
/// GNU Time records how long a process ran but not when it ended. The end is
/// `exit_time` when given, else the log file's modification time; the start
/// is that end minus the recorded wall clock time.
///
/// In deterministic mode the root node's UUID is derived from the log's
/// content, so re-running on the same log reproduces every identifier.
pub fn build_process_object<'a, S: TripleSink>(
    sink: &'a mut S,
    config: &ProcessConfig,
    gnu_time_log: &Path,
    exit_time: Option<&str>,
) -> Result<ProcessRecord<'a, S>> {
    let node_uuid = if config.id_policy.is_deterministic() {
        let content = fs::read(gnu_time_log).map_err(|e| GnuTimeError::io(gnu_time_log, e))?;
        Some(identifier::content_uuid(
            &config.namespace,
            &config.prefix_slug,
            &content,
        ))
    } else {
        None
    };

    let mut record = ProcessRecord::with_node_uuid(sink, config, node_uuid);
    if let Some(exit_time) = exit_time {
        record.set_exit_time(exit_time)?;
    }
    record.populate_from_gnu_time_log(gnu_time_log)?;
    Ok(record)
}

/// Everything one invocation needs
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    pub config: ProcessConfig,
    pub gnu_time_log: PathBuf,
    pub done_log: Option<PathBuf>,
    pub out_graph: PathBuf,
    pub output_format: Option<RdfFormat>,
}

/// Summary of a completed conversion
#[derive(Debug, Clone)]
pub struct ConversionReport {
    pub node: String,
    pub triples: usize,
    pub format: RdfFormat,
}

/// Run a full conversion and write the output graph.
///
/// The output file is only created after the record is fully built.
pub fn run(request: &ConversionRequest) -> Result<ConversionReport> {
    let format = RdfFormat::resolve(request.output_format, &request.out_graph)?;
    debug!(format = %format, "resolved output format");

    let exit_time = request.done_log.as_deref().map(read_done_log).transpose()?;
    if let Some(exit_time) = &exit_time {
        debug!(exit_time = %exit_time, "exit time read from done-log");
    }

    let mut graph = Graph::for_process(&request.config.namespace);
    let node = build_process_object(
        &mut graph,
        &request.config,
        &request.gnu_time_log,
        exit_time.as_deref(),
    )?
    .node()
    .to_string();

    graph.serialize_to_path(&request.out_graph, format)?;
    info!(
        node = %node,
        triples = graph.len(),
        output = %request.out_graph.display(),
        "wrote process graph"
    );

    Ok(ConversionReport {
        node,
        triples: graph.len(),
        format,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Term;
    use crate::identifier::IdPolicy;
    use crate::vocab;
    use tempfile::TempDir;

    const LOG: &str = "\tCommand being timed: \"sleep 62.5\"
\tElapsed (wall clock) time (h:mm:ss or m:ss): 1:02.50
\tExit status: 0
";

    fn facet_literal(graph: &Graph, predicate: &str) -> Vec<String> {
        let facet = graph
            .subjects_of_type(vocab::PROCESS_FACET)
            .next()
            .unwrap()
            .to_string();
        graph
            .objects(&facet, predicate)
            .filter_map(Term::lexical)
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_read_done_log_strips_whitespace() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("done.log");
        fs::write(&path, "  2024-01-01T00:10:00+00:00\n\n").unwrap();
        assert_eq!(read_done_log(&path).unwrap(), "2024-01-01T00:10:00+00:00");
    }

    #[test]
    fn test_read_done_log_reads_only_head() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("done.log");
        let long = format!("2024-01-01T00:10:00+00:00{}", " ".repeat(39) + "trailing junk");
        fs::write(&path, long).unwrap();
        assert_eq!(read_done_log(&path).unwrap(), "2024-01-01T00:10:00+00:00");
    }

    #[test]
    fn test_read_done_log_missing() {
        let err = read_done_log("/nonexistent/done.log").unwrap_err();
        assert!(matches!(err, GnuTimeError::Io { .. }));
    }

    #[test]
    fn test_build_with_exit_time() {
        let dir = TempDir::new().unwrap();
        let log = dir.path().join("time.log");
        fs::write(&log, LOG).unwrap();

        let mut graph = Graph::new();
        build_process_object(
            &mut graph,
            &ProcessConfig::default(),
            &log,
            Some("2024-01-01T00:10:00+00:00"),
        )
        .unwrap();

        assert_eq!(facet_literal(&graph, vocab::EXIT_STATUS), vec!["0"]);
        assert_eq!(
            facet_literal(&graph, vocab::EXIT_TIME),
            vec!["2024-01-01T00:10:00+00:00"]
        );
        assert_eq!(
            facet_literal(&graph, vocab::OBSERVABLE_CREATED_TIME),
            vec!["2024-01-01T00:08:57.500000+00:00"]
        );
        // node type, facet type, hasFacet, three facet fields
        assert_eq!(graph.len(), 6);
    }

    #[test]
    fn test_build_rejects_bad_exit_time() {
        let dir = TempDir::new().unwrap();
        let log = dir.path().join("time.log");
        fs::write(&log, LOG).unwrap();

        let mut graph = Graph::new();
        let err = build_process_object(
            &mut graph,
            &ProcessConfig::default(),
            &log,
            Some("last tuesday"),
        )
        .unwrap_err();
        assert!(matches!(err, GnuTimeError::InvalidTimestamp { .. }));
    }

    #[test]
    fn test_build_deterministic_is_reproducible() {
        let dir = TempDir::new().unwrap();
        let log = dir.path().join("time.log");
        fs::write(&log, LOG).unwrap();
        let config = ProcessConfig::default().with_id_policy(IdPolicy::Deterministic);

        let mut first = Graph::new();
        build_process_object(&mut first, &config, &log, Some("2024-01-01T00:10:00+00:00"))
            .unwrap();
        let mut second = Graph::new();
        build_process_object(&mut second, &config, &log, Some("2024-01-01T00:10:00+00:00"))
            .unwrap();

        let a: Vec<_> = first.triples().collect();
        let b: Vec<_> = second.triples().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_run_writes_turtle() {
        let dir = TempDir::new().unwrap();
        let log = dir.path().join("time.log");
        let done = dir.path().join("done.log");
        let out = dir.path().join("process.ttl");
        fs::write(&log, LOG).unwrap();
        fs::write(&done, "2024-01-01T00:10:00+00:00\n").unwrap();

        let report = run(&ConversionRequest {
            config: ProcessConfig::default(),
            gnu_time_log: log,
            done_log: Some(done),
            out_graph: out.clone(),
            output_format: None,
        })
        .unwrap();

        assert_eq!(report.format, RdfFormat::Turtle);
        assert_eq!(report.triples, 6);
        let written = fs::read_to_string(&out).unwrap();
        assert!(written.contains("\"2024-01-01T00:08:57.500000+00:00\"^^xsd:dateTime"));
        assert!(written.contains("uco-observable:exitStatus \"0\"^^xsd:long"));
    }

    #[test]
    fn test_run_failure_leaves_no_output() {
        let dir = TempDir::new().unwrap();
        let log = dir.path().join("time.log");
        let out = dir.path().join("process.nt");
        fs::write(&log, "\tExit status: 0\n").unwrap();

        let err = run(&ConversionRequest {
            config: ProcessConfig::default(),
            gnu_time_log: log,
            done_log: None,
            out_graph: out.clone(),
            output_format: None,
        })
        .unwrap_err();

        assert!(matches!(err, GnuTimeError::MissingKey(_)));
        assert!(!out.exists());
    }
}
