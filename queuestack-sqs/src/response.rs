//! Typed action responses
//!
//! Each struct mirrors the element layout of the service's XML reply; the
//! root element name itself is not checked.

use md5::{Digest, Md5};
use quick_xml::events::{BytesCData, BytesText, Event};
use quick_xml::{DeError, Reader, Writer};
use queuestack_core::ResponseMetadata;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::params;

/// Hex MD5 of a message body, as reported by the service
pub fn md5_hex(body: &str) -> String {
    hex::encode(Md5::digest(body.as_bytes()))
}

/// Decode a reply body, keeping element text exactly as sent.
///
/// The serde deserializer trims whitespace around text content, which would
/// corrupt message bodies and break their MD5 check. Text that is the whole
/// content of an element is re-emitted as CDATA first, which the deserializer
/// passes through untouched.
pub fn from_xml<T: DeserializeOwned>(xml: &str) -> Result<T, DeError> {
    let xml = preserve_text(xml)?;
    quick_xml::de::from_str(&xml)
}

fn preserve_text(xml: &str) -> Result<String, DeError> {
    let mut reader = Reader::from_str(xml);
    let mut writer = Writer::new(Vec::with_capacity(xml.len()));
    let mut pending: Option<BytesText<'_>> = None;
    let mut after_start = false;

    loop {
        let event = reader.read_event()?;
        if let Some(text) = pending.take() {
            if matches!(event, Event::End(_)) {
                write_cdata(&mut writer, &text.unescape()?)?;
            } else {
                writer.write_event(Event::Text(text))?;
            }
        }

        let opens = matches!(event, Event::Start(_));
        match event {
            Event::Eof => break,
            Event::Text(text) if after_start => pending = Some(text),
            other => writer.write_event(other)?,
        }
        after_start = opens;
    }

    Ok(String::from_utf8(writer.into_inner())?)
}

/// A CDATA section cannot contain `]]>`, so the text is split across sections there
fn write_cdata(writer: &mut Writer<Vec<u8>>, mut text: &str) -> Result<(), DeError> {
    while let Some(pos) = text.find("]]>") {
        writer.write_event(Event::CData(BytesCData::new(&text[..pos + 2])))?;
        text = &text[pos + 2..];
    }
    writer.write_event(Event::CData(BytesCData::new(text)))?;
    Ok(())
}

/// Reply of actions whose only payload is the metadata block
/// (DeleteQueue, DeleteMessage, ChangeMessageVisibility, SetQueueAttributes)
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MetadataResponse {
    #[serde(default)]
    pub response_metadata: ResponseMetadata,
}

pub type DeleteQueueResponse = MetadataResponse;
pub type DeleteMessageResponse = MetadataResponse;
pub type ChangeMessageVisibilityResponse = MetadataResponse;
pub type SetQueueAttributesResponse = MetadataResponse;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QueueUrlResult {
    pub queue_url: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateQueueResponse {
    pub create_queue_result: QueueUrlResult,
    #[serde(default)]
    pub response_metadata: ResponseMetadata,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetQueueUrlResponse {
    pub get_queue_url_result: QueueUrlResult,
    #[serde(default)]
    pub response_metadata: ResponseMetadata,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ListQueuesResult {
    #[serde(rename = "QueueUrl", default)]
    pub queue_urls: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListQueuesResponse {
    #[serde(default)]
    pub list_queues_result: ListQueuesResult,
    #[serde(default)]
    pub response_metadata: ResponseMetadata,
}

impl ListQueuesResponse {
    pub fn queue_urls(&self) -> &[String] {
        &self.list_queues_result.queue_urls
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SendMessageResult {
    #[serde(rename = "MD5OfMessageBody", default)]
    pub md5_of_message_body: String,
    #[serde(rename = "MessageId")]
    pub message_id: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SendMessageResponse {
    pub send_message_result: SendMessageResult,
    #[serde(default)]
    pub response_metadata: ResponseMetadata,
}

impl SendMessageResponse {
    pub fn message_id(&self) -> &str {
        &self.send_message_result.message_id
    }

    /// Whether the service-reported digest matches the body that was sent
    pub fn verify_md5(&self, body: &str) -> bool {
        self.send_message_result
            .md5_of_message_body
            .eq_ignore_ascii_case(&md5_hex(body))
    }
}

/// A name/value pair, used for message and queue attributes
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Attribute {
    pub name: String,
    #[serde(default)]
    pub value: String,
}

/// A received message
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Message {
    #[serde(rename = "MessageId")]
    pub message_id: String,
    #[serde(rename = "Body", default)]
    pub body: String,
    #[serde(rename = "MD5OfBody", default)]
    pub md5_of_body: String,
    /// Single-use token for delete and visibility changes
    #[serde(rename = "ReceiptHandle")]
    pub receipt_handle: String,
    #[serde(rename = "Attribute", default)]
    pub attributes: Vec<Attribute>,
}

impl Message {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        find_attribute(&self.attributes, name)
    }

    pub fn verify_md5(&self) -> bool {
        self.md5_of_body.eq_ignore_ascii_case(&md5_hex(&self.body))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ReceiveMessageResult {
    #[serde(rename = "Message", default)]
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReceiveMessageResponse {
    #[serde(default)]
    pub receive_message_result: ReceiveMessageResult,
    #[serde(default)]
    pub response_metadata: ResponseMetadata,
}

impl ReceiveMessageResponse {
    pub fn messages(&self) -> &[Message] {
        &self.receive_message_result.messages
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct QueueAttributes {
    #[serde(rename = "Attribute", default)]
    pub attributes: Vec<Attribute>,
}

impl QueueAttributes {
    pub fn get(&self, name: &str) -> Option<&str> {
        find_attribute(&self.attributes, name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetQueueAttributesResponse {
    #[serde(default)]
    pub get_queue_attributes_result: QueueAttributes,
    #[serde(default)]
    pub response_metadata: ResponseMetadata,
}

impl GetQueueAttributesResponse {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.get_queue_attributes_result.get(name)
    }
}

fn find_attribute<'a>(attributes: &'a [Attribute], name: &str) -> Option<&'a str> {
    attributes
        .iter()
        .find(|a| a.name == name)
        .map(|a| a.value.as_str())
}

/// A batch entry the service rejected
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BatchResultErrorEntry {
    pub id: String,
    /// True when the request was at fault rather than the service
    #[serde(default)]
    pub sender_fault: bool,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

impl BatchResultErrorEntry {
    /// Zero-based position of the failed entry in the submitted batch
    pub fn index(&self) -> Option<usize> {
        params::entry_index(&self.id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SendMessageBatchResultEntry {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "MessageId")]
    pub message_id: String,
    #[serde(rename = "MD5OfMessageBody", default)]
    pub md5_of_message_body: String,
}

impl SendMessageBatchResultEntry {
    pub fn index(&self) -> Option<usize> {
        params::entry_index(&self.id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SendMessageBatchResult {
    #[serde(rename = "SendMessageBatchResultEntry", default)]
    pub successful: Vec<SendMessageBatchResultEntry>,
    #[serde(rename = "BatchResultErrorEntry", default)]
    pub failed: Vec<BatchResultErrorEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SendMessageBatchResponse {
    #[serde(default)]
    pub send_message_batch_result: SendMessageBatchResult,
    #[serde(default)]
    pub response_metadata: ResponseMetadata,
}

impl SendMessageBatchResponse {
    pub fn successful(&self) -> &[SendMessageBatchResultEntry] {
        &self.send_message_batch_result.successful
    }

    pub fn failed(&self) -> &[BatchResultErrorEntry] {
        &self.send_message_batch_result.failed
    }

    pub fn is_success(&self) -> bool {
        self.failed().is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteMessageBatchResultEntry {
    pub id: String,
}

impl DeleteMessageBatchResultEntry {
    pub fn index(&self) -> Option<usize> {
        params::entry_index(&self.id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DeleteMessageBatchResult {
    #[serde(rename = "DeleteMessageBatchResultEntry", default)]
    pub successful: Vec<DeleteMessageBatchResultEntry>,
    #[serde(rename = "BatchResultErrorEntry", default)]
    pub failed: Vec<BatchResultErrorEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteMessageBatchResponse {
    #[serde(default)]
    pub delete_message_batch_result: DeleteMessageBatchResult,
    #[serde(default)]
    pub response_metadata: ResponseMetadata,
}

impl DeleteMessageBatchResponse {
    pub fn successful(&self) -> &[DeleteMessageBatchResultEntry] {
        &self.delete_message_batch_result.successful
    }

    pub fn failed(&self) -> &[BatchResultErrorEntry] {
        &self.delete_message_batch_result.failed
    }

    pub fn is_success(&self) -> bool {
        self.failed().is_empty()
    }
}
