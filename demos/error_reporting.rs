//! Error reporting example
//!
//! Shows how an `error` attribute turns a record into an Error Reporting
//! event, and how the rewrite hook can redact and rename attributes.
//!
//! Run with: cargo run --example error_reporting

use gcp_logger_system::prelude::*;
use gcp_logger_system::{error, traced_error, ERROR_KEY};
use std::fmt;

#[derive(Debug)]
struct QuotaError {
    project: String,
    limit: u64,
}

impl fmt::Display for QuotaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "quota of {} exceeded for {}", self.limit, self.project)
    }
}

impl std::error::Error for QuotaError {}

impl ReportableError for QuotaError {
    fn report_location(&self) -> Option<ReportLocation> {
        Some(gcp_logger_system::report_location!())
    }

    fn log_value(&self) -> Option<Value> {
        Some(Value::group([
            Attr::new("project", self.project.clone()),
            Attr::new("limit", self.limit),
        ]))
    }
}

fn upload(bucket: &str) -> std::result::Result<(), TracedError> {
    Err(traced_error!("bucket {} not found", bucket))
}

fn main() -> Result<()> {
    let logger = Logger::builder()
        .add_source(true)
        .replace_attr(|groups: &[String], mut attr: Attr| {
            if attr.key == "password" {
                attr.key.clear();
            } else if groups.is_empty() && attr.key == "err" {
                attr.key = ERROR_KEY.to_string();
            }
            attr
        })
        .build();

    // Plain string: message becomes the string, no report location
    logger.error_with_attrs("Payment declined", [Attr::new("error", "card expired")]);

    // Traced error: backtrace as message, creation site as reportLocation
    if let Err(err) = upload("logs-archive") {
        error!(logger, "Upload failed"; "error" => err);
    }

    // Structured error value and a location
    logger.error_with_attrs(
        "Quota check failed",
        [Attr::err(QuotaError {
            project: "demo-project".to_string(),
            limit: 1000,
        })],
    );

    // `err` is renamed by the hook; `password` is dropped
    logger.with([Attr::new("password", "hunter2")]).warn_with_attrs(
        "Login retried",
        [Attr::std_err(std::io::Error::new(
            std::io::ErrorKind::TimedOut,
            "auth backend timed out",
        ))],
    );
    logger.error_with_attrs("Legacy key", [Attr::new("err", "renamed to error")]);

    // Grouped errors stay plain fields
    logger
        .with_group("retry")
        .warn_with_attrs("Giving up", [Attr::new("error", "not a report")]);

    logger.flush()?;
    Ok(())
}
