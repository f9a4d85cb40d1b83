use clap::ValueEnum;
use tracing::subscriber::set_global_default;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_error::ErrorLayer;
use tracing_log::LogTracer;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Registry};
use tracing_tree::HierarchicalLayer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Indented output for reading in a terminal
    Tree,
    /// One bunyan-style JSON object per line
    Json,
}

/// Send logs to stderr so that they don't mix with command output.
pub fn configure(name: impl Into<String>, format: LogFormat) -> Result<(), eyre::Report> {
    LogTracer::builder()
        .ignore_crate("rustls")
        .with_max_level(log::LevelFilter::Debug)
        .init()?;

    let env_filter = EnvFilter::try_from_env("LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    match format {
        LogFormat::Tree => {
            let tree = HierarchicalLayer::new(2)
                .with_writer(std::io::stderr)
                .with_targets(true)
                .with_bracketed_fields(true);

            let subscriber = Registry::default()
                .with(env_filter)
                .with(tree)
                .with(ErrorLayer::default());
            set_global_default(subscriber)?;
        }
        LogFormat::Json => {
            let formatting_layer = BunyanFormattingLayer::new(name.into(), std::io::stderr);
            let subscriber = Registry::default()
                .with(env_filter)
                .with(JsonStorageLayer)
                .with(formatting_layer)
                .with(ErrorLayer::default());
            set_global_default(subscriber)?;
        }
    }

    Ok(())
}
