use crate::types::LogLevel;
use tracing_subscriber::{EnvFilter, fmt};

const CRATES: [&str; 4] = ["qoelog", "qoelog_parser", "qoelog_engine", "qoelog_runtime"];

/// Install the stderr subscriber; `RUST_LOG` wins over `--log-level`
pub fn init(level: LogLevel) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let directives: Vec<String> = CRATES
            .iter()
            .map(|krate| format!("{}={}", krate, level))
            .collect();
        EnvFilter::new(format!("warn,{}", directives.join(",")))
    });

    // a second init (tests) keeps the first subscriber
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
