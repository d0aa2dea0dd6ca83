//! CLI argument parsing for case_gnu_time

use crate::config::{ProcessConfig, DEFAULT_BASE_PREFIX, DEFAULT_PREFIX_SLUG};
use crate::convert::ConversionRequest;
use crate::identifier::IdPolicy;
use crate::serialize::RdfFormat;
use crate::vocab::Namespace;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "case_gnu_time")]
#[command(version)]
#[command(about = "Map the output of GNU Time --verbose to a UCO Process graph node", long_about = None)]
pub struct Cli {
    /// Namespace IRI for generated node identifiers
    #[arg(long = "base-prefix", value_name = "IRI", default_value = DEFAULT_BASE_PREFIX)]
    pub base_prefix: Namespace,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// File recording the completion time of the timed process, as an ISO-8601
    /// string. Without it, the modification time of GNU_TIME_LOG is used.
    #[arg(long = "done-log", value_name = "PATH")]
    pub done_log: Option<PathBuf>,

    /// Override the extension-based output format guess
    #[arg(long = "output-format", value_enum, value_name = "FORMAT")]
    pub output_format: Option<RdfFormat>,

    /// Slug placed before the Process node's UUID
    #[arg(long = "prefix-slug", value_name = "SLUG", default_value = DEFAULT_PREFIX_SLUG)]
    pub prefix_slug: String,

    /// Derive identifiers from log content instead of generating random ones
    #[arg(long)]
    pub deterministic: bool,

    /// Output of GNU Time run with --verbose (recorded with --output). Supplies
    /// the exit status, the run length, and the end time if --done-log is absent.
    #[arg(value_name = "GNU_TIME_LOG")]
    pub gnu_time_log: PathBuf,

    /// RDF graph file to write, in --output-format or guessed from its extension
    #[arg(value_name = "OUT_GRAPH")]
    pub out_graph: PathBuf,
}

impl Cli {
    pub fn process_config(&self) -> ProcessConfig {
        let policy = if self.deterministic {
            IdPolicy::Deterministic
        } else {
            IdPolicy::Random
        };
        ProcessConfig::new(self.base_prefix.clone())
            .with_prefix_slug(self.prefix_slug.clone())
            .with_id_policy(policy)
    }

    pub fn to_request(&self) -> ConversionRequest {
        ConversionRequest {
            config: self.process_config(),
            gnu_time_log: self.gnu_time_log.clone(),
            done_log: self.done_log.clone(),
            out_graph: self.out_graph.clone(),
            output_format: self.output_format,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_positionals() {
        let cli = Cli::parse_from(["case_gnu_time", "time.log", "out.ttl"]);
        assert_eq!(cli.gnu_time_log, PathBuf::from("time.log"));
        assert_eq!(cli.out_graph, PathBuf::from("out.ttl"));
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["case_gnu_time", "time.log", "out.ttl"]);
        assert_eq!(cli.base_prefix.as_str(), "http://example.org/kb/");
        assert_eq!(cli.prefix_slug, "process-");
        assert!(!cli.debug);
        assert!(!cli.deterministic);
        assert!(cli.done_log.is_none());
        assert!(cli.output_format.is_none());
    }

    #[test]
    fn test_cli_requires_both_positionals() {
        assert!(Cli::try_parse_from(["case_gnu_time", "time.log"]).is_err());
    }

    #[test]
    fn test_cli_output_format_values() {
        let cli = Cli::parse_from([
            "case_gnu_time",
            "--output-format",
            "json-ld",
            "time.log",
            "out.txt",
        ]);
        assert_eq!(cli.output_format, Some(RdfFormat::JsonLd));

        let cli = Cli::parse_from(["case_gnu_time", "--output-format", "ttl", "a", "b"]);
        assert_eq!(cli.output_format, Some(RdfFormat::Turtle));

        assert!(Cli::try_parse_from(["case_gnu_time", "--output-format", "xml", "a", "b"]).is_err());
    }

    #[test]
    fn test_cli_rejects_unsafe_base_prefix() {
        for bad in ["http://example.org/my kb/", "http://example.org/kb>/"] {
            let err = Cli::try_parse_from(["case_gnu_time", "--base-prefix", bad, "a", "b"])
                .unwrap_err();
            assert!(err.to_string().contains("Invalid namespace IRI"), "{err}");
        }
    }

    #[test]
    fn test_cli_to_request() {
        let cli = Cli::parse_from([
            "case_gnu_time",
            "--base-prefix",
            "urn:example:",
            "--prefix-slug",
            "custom-",
            "--deterministic",
            "--done-log",
            "done.log",
            "time.log",
            "out.nt",
        ]);
        let request = cli.to_request();
        assert_eq!(request.config.namespace.as_str(), "urn:example:");
        assert_eq!(request.config.prefix_slug, "custom-");
        assert_eq!(request.config.id_policy, IdPolicy::Deterministic);
        assert_eq!(request.done_log, Some(PathBuf::from("done.log")));
        assert_eq!(request.out_graph, PathBuf::from("out.nt"));
    }
}
