//! Test utilities for queuestack
//!
//! Provides an in-process mock of the SQS query endpoint:
//! - Serves queued XML replies in order
//! - Records the path and query parameters of every request
//! - Helpers to build success and error reply bodies
//!
//! ## Usage
//!
//! ```rust,no_run
//! use queuestack_test::MockServer;
//!
//! let server = MockServer::start().unwrap();
//! server.reply(200, queuestack_test::ok_body("DeleteQueue", ""));
//!
//! // point the client at server.url(), then inspect server.requests()
//! ```

pub mod server;

pub use server::{error_body, ok_body, MockServer, RecordedRequest, TestError};

/// Install a `fmt` subscriber honouring `RUST_LOG`; repeated calls are no-ops
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "queuestack_sqs=debug,queuestack_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}
