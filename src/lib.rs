//! case_gnu_time - Map GNU Time `--verbose` logs to UCO Process graph nodes
//!
//! GNU Time reports how long a command ran and how it exited, but not when it
//! started or ended. This library reconstructs both ends from an exit time
//! (a done-log, or the log file's modification time) and the recorded wall
//! clock duration, and writes the result as a UCO `ObservableObject` with a
//! `ProcessFacet`.
//!
//! # Example
//!
//! ```no_run
//! use case_gnu_time::config::ProcessConfig;
//! use case_gnu_time::convert::build_process_object;
//! use case_gnu_time::graph::Graph;
//! use case_gnu_time::serialize::RdfFormat;
//! use std::path::Path;
//!
//! # fn main() -> case_gnu_time::Result<()> {
//! let config = ProcessConfig::default();
//! let mut graph = Graph::for_process(&config.namespace);
//! build_process_object(
//!     &mut graph,
//!     &config,
//!     Path::new("gnu_time.log"),
//!     Some("2024-01-01T00:10:00+00:00"),
//! )?;
//! graph.serialize_to_path(Path::new("process.ttl"), RdfFormat::Turtle)?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod convert;
pub mod error;
pub mod gnu_time;
pub mod graph;
pub mod identifier;
pub mod process;
pub mod serialize;
pub mod timestamp;
pub mod vocab;

pub use error::{GnuTimeError, Result};
