//! Synchronous SQS query-protocol client
//!
//! Each call builds the action's parameters, signs them, issues one HTTP GET
//! and decodes the XML reply:
//! - CreateQueue, GetQueueUrl, ListQueues on [`Sqs`]
//! - DeleteQueue, SendMessage, ReceiveMessage, DeleteMessage,
//!   ChangeMessageVisibility, Get/SetQueueAttributes and the batch actions on [`Queue`]
//!
//! ```rust,no_run
//! use queuestack_sqs::{Credentials, Region, Sqs};
//!
//! let sqs = Sqs::new(
//!     Credentials::new("AKID", "secret"),
//!     Region::from_name("us-east-1").unwrap(),
//! )
//! .unwrap();
//!
//! let queue = sqs.create_queue("jobs").unwrap();
//! queue.send_message("hello").unwrap();
//! for message in queue.receive_message(10, 30).unwrap().messages() {
//!     queue.delete_message(message).unwrap();
//! }
//! ```

pub mod config;
mod error;
pub mod params;
pub mod query;
mod queue;
pub mod response;
mod service;
pub mod transport;

pub use config::{ClientConfig, Settings};
pub use error::{DecodeError, SqsError};
pub use queue::{Queue, ALL_ATTRIBUTES};
pub use query::RequestTarget;
pub use response::*;
pub use service::{Sqs, DEFAULT_VISIBILITY_TIMEOUT_SECS};
pub use transport::{HttpResponse, ReqwestTransport, Transport, TransportError};

pub use queuestack_auth::{SignatureV2, Signer, SignerError};
pub use queuestack_core::{Credentials, ParameterMap, Region, ResponseMetadata, ServiceError};
