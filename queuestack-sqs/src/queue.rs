//! Queue handle and queue-level actions

use queuestack_core::ParameterMap;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::params::ParamsBuilder;
use crate::response::{
    ChangeMessageVisibilityResponse, DeleteMessageBatchResponse, DeleteMessageResponse,
    DeleteQueueResponse, GetQueueAttributesResponse, Message, ReceiveMessageResponse,
    SendMessageBatchResponse, SendMessageResponse, SetQueueAttributesResponse,
};
use crate::service::Sqs;
use crate::SqsError;

/// Attribute name that selects every attribute
pub const ALL_ATTRIBUTES: &str = "All";

/// A queue, addressed by its URL.
///
/// Borrows the [`Sqs`] handle it was created from; requests are signed with
/// that handle's credentials and sent through its transport.
#[derive(Debug, Clone)]
pub struct Queue<'a> {
    sqs: &'a Sqs,
    url: String,
}

impl<'a> Queue<'a> {
    pub(crate) fn new(sqs: &'a Sqs, url: impl Into<String>) -> Self {
        Self {
            sqs,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn sqs(&self) -> &'a Sqs {
        self.sqs
    }

    fn query<T: DeserializeOwned>(&self, params: ParameterMap) -> Result<T, SqsError> {
        self.sqs.query(Some(&self.url), params)
    }

    pub fn delete(&self) -> Result<DeleteQueueResponse, SqsError> {
        debug!(url = %self.url, "Deleting queue");
        self.query(ParamsBuilder::new("DeleteQueue").build())
    }

    pub fn send_message(&self, body: &str) -> Result<SendMessageResponse, SqsError> {
        let params = ParamsBuilder::new("SendMessage")
            .set("MessageBody", body)
            .build();
        self.query(params)
    }

    /// Receive up to `max_messages`, hiding them for `visibility_timeout_secs`.
    ///
    /// All message attributes are requested.
    pub fn receive_message(
        &self,
        max_messages: u32,
        visibility_timeout_secs: u32,
    ) -> Result<ReceiveMessageResponse, SqsError> {
        let params = ParamsBuilder::new("ReceiveMessage")
            .set("AttributeName", ALL_ATTRIBUTES)
            .set("MaxNumberOfMessages", max_messages)
            .set("VisibilityTimeout", visibility_timeout_secs)
            .build();
        self.query(params)
    }

    pub fn change_message_visibility(
        &self,
        message: &Message,
        visibility_timeout_secs: u32,
    ) -> Result<ChangeMessageVisibilityResponse, SqsError> {
        let params = ParamsBuilder::new("ChangeMessageVisibility")
            .set("VisibilityTimeout", visibility_timeout_secs)
            .set("ReceiptHandle", &message.receipt_handle)
            .build();
        self.query(params)
    }

    /// Fetch one named attribute, or every attribute with [`ALL_ATTRIBUTES`]
    pub fn get_queue_attributes(
        &self,
        attribute: &str,
    ) -> Result<GetQueueAttributesResponse, SqsError> {
        let params = ParamsBuilder::new("GetQueueAttributes")
            .set("AttributeName", attribute)
            .build();
        self.query(params)
    }

    pub fn get_all_queue_attributes(&self) -> Result<GetQueueAttributesResponse, SqsError> {
        self.get_queue_attributes(ALL_ATTRIBUTES)
    }

    pub fn set_queue_attribute(
        &self,
        name: &str,
        value: &str,
    ) -> Result<SetQueueAttributesResponse, SqsError> {
        let params = ParamsBuilder::new("SetQueueAttributes")
            .set("Attribute.Name", name)
            .set("Attribute.Value", value)
            .build();
        self.query(params)
    }

    pub fn delete_message(&self, message: &Message) -> Result<DeleteMessageResponse, SqsError> {
        let params = ParamsBuilder::new("DeleteMessage")
            .set("ReceiptHandle", &message.receipt_handle)
            .build();
        self.query(params)
    }

    /// Send several bodies in one request.
    ///
    /// Entry `i` of `bodies` is submitted with id `msg-<i + 1>`; per-entry
    /// failures are reported in the response, not as an error.
    pub fn send_message_batch<S: AsRef<str>>(
        &self,
        bodies: &[S],
    ) -> Result<SendMessageBatchResponse, SqsError> {
        let entries = bodies
            .iter()
            .map(|body| [("MessageBody", body.as_ref().to_string())]);
        let params = ParamsBuilder::new("SendMessageBatch")
            .batch("SendMessageBatchRequestEntry", entries)
            .build();
        self.query(params)
    }

    /// Delete several messages in one request, ids assigned as in
    /// [`send_message_batch`](Self::send_message_batch)
    pub fn delete_message_batch(
        &self,
        messages: &[Message],
    ) -> Result<DeleteMessageBatchResponse, SqsError> {
        let entries = messages
            .iter()
            .map(|m| [("ReceiptHandle", m.receipt_handle.clone())]);
        let params = ParamsBuilder::new("DeleteMessageBatch")
            .batch("DeleteMessageBatchRequestEntry", entries)
            .build();
        self.query(params)
    }
}
