use anyhow::{Context, Result};
use case_gnu_time::{cli::Cli, convert};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber; --debug lowers the default level to DEBUG
fn init_tracing(debug: bool) {
    let level = if debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.debug);

    let request = args.to_request();
    convert::run(&request).with_context(|| {
        format!(
            "Failed to convert {} into {}",
            request.gnu_time_log.display(),
            request.out_graph.display()
        )
    })?;

    Ok(())
}
