//! Basic logger usage example
//!
//! Writes Cloud Logging JSON lines to stdout at different levels, with
//! scoped loggers and call-site attributes.
//!
//! Run with: cargo run --example basic_usage

use gcp_logger_system::prelude::*;
use gcp_logger_system::{info, warn};

fn main() -> Result<()> {
    let level = std::env::var("LOG_LEVEL")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(LogLevel::Debug);

    let logger = Logger::builder()
        .min_level(level)
        .add_source(true)
        .appender(JsonAppender::stdout())
        .build();

    // Severity follows the level; trace is below the minimum here
    logger.trace("This is a trace message");
    logger.debug("This is a debug message");
    logger.info("This is an info message");
    logger.warn("This is a warning message");

    // Derived loggers share bindings without copying them
    let request = logger
        .with_group("request")
        .with([Attr::new("method", "GET"), Attr::new("path", "/users/42")]);
    request.info_with_attrs("Request handled", [Attr::new("status", 200)]);

    // Macros also record the enclosing function
    let port = 8080;
    info!(logger, "Server listening on port {}", port; "tls" => false);
    warn!(request, "Slow response"; "latency_ms" => 1250.0);

    logger
        .info_builder()
        .message("Cache stats")
        .group("cache", [Attr::new("hits", 980), Attr::new("misses", 20)])
        .log();

    logger.flush()?;
    Ok(())
}
