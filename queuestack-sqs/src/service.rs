//! Service handle and service-level actions

use queuestack_auth::{SignatureV2, Signer};
use queuestack_core::{Credentials, ParameterMap, Region};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::info;

use crate::config::{ClientConfig, Settings};
use crate::params::ParamsBuilder;
use crate::query::{self, QueryContext};
use crate::queue::Queue;
use crate::response::{CreateQueueResponse, GetQueueUrlResponse, ListQueuesResponse};
use crate::transport::{ReqwestTransport, Transport};
use crate::SqsError;

/// Visibility timeout applied by [`Sqs::create_queue`]
pub const DEFAULT_VISIBILITY_TIMEOUT_SECS: u32 = 30;

/// Handle to the queue service in one region.
///
/// Holds only immutable configuration, so one handle can be shared across
/// threads and reused for any number of calls.
#[derive(Clone)]
pub struct Sqs {
    credentials: Credentials,
    region: Region,
    config: ClientConfig,
    signer: Arc<dyn Signer>,
    transport: Arc<dyn Transport>,
}

impl Sqs {
    /// Create a handle with default client options
    pub fn new(credentials: Credentials, region: Region) -> Result<Self, SqsError> {
        Self::with_config(credentials, region, ClientConfig::default())
    }

    pub fn with_config(
        credentials: Credentials,
        region: Region,
        config: ClientConfig,
    ) -> Result<Self, SqsError> {
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::with_transport(
            credentials,
            region,
            config,
            Arc::new(transport),
        ))
    }

    /// Create a handle that sends requests through a caller-provided transport
    pub fn with_transport(
        credentials: Credentials,
        region: Region,
        config: ClientConfig,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            credentials,
            region,
            config,
            signer: Arc::new(SignatureV2),
            transport,
        }
    }

    /// Create a handle from loaded [`Settings`]
    pub fn from_settings(settings: Settings) -> Result<Self, SqsError> {
        let region = settings.region()?;
        Self::with_config(settings.credentials, region, settings.client)
    }

    /// Replace the request signer
    pub fn with_signer(mut self, signer: Arc<dyn Signer>) -> Self {
        self.signer = signer;
        self
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Create a queue with the default visibility timeout
    pub fn create_queue(&self, name: &str) -> Result<Queue<'_>, SqsError> {
        self.create_queue_with_timeout(name, DEFAULT_VISIBILITY_TIMEOUT_SECS)
    }

    pub fn create_queue_with_timeout(
        &self,
        name: &str,
        visibility_timeout_secs: u32,
    ) -> Result<Queue<'_>, SqsError> {
        let params = ParamsBuilder::new("CreateQueue")
            .set("QueueName", name)
            .set("DefaultVisibilityTimeout", visibility_timeout_secs)
            .build();

        let resp: CreateQueueResponse = self.query(None, params)?;
        info!(name = %name, url = %resp.create_queue_result.queue_url, "Created queue");
        Ok(Queue::new(self, resp.create_queue_result.queue_url))
    }

    /// Look up an existing queue by name
    pub fn get_queue(&self, name: &str) -> Result<Queue<'_>, SqsError> {
        let params = ParamsBuilder::new("GetQueueUrl")
            .set("QueueName", name)
            .build();

        let resp: GetQueueUrlResponse = self.query(None, params)?;
        Ok(Queue::new(self, resp.get_queue_url_result.queue_url))
    }

    /// Wrap a known queue URL without contacting the service
    pub fn queue_from_url(&self, url: impl Into<String>) -> Queue<'_> {
        Queue::new(self, url)
    }

    /// List queue URLs, optionally restricted to names starting with `prefix`
    pub fn list_queues(&self, prefix: Option<&str>) -> Result<ListQueuesResponse, SqsError> {
        let params = ParamsBuilder::new("ListQueues")
            .set_opt("QueueNamePrefix", prefix)
            .build();

        self.query(None, params)
    }

    /// Run one call: sign, execute, decode
    pub(crate) fn query<T: DeserializeOwned>(
        &self,
        queue_url: Option<&str>,
        params: ParameterMap,
    ) -> Result<T, SqsError> {
        let ctx = QueryContext {
            endpoint: &self.region.sqs_endpoint,
            credentials: &self.credentials,
            signer: self.signer.as_ref(),
            transport: self.transport.as_ref(),
            debug: self.config.debug,
        };
        let response = query::execute(&ctx, queue_url, params)?;
        query::decode(response)
    }
}

impl std::fmt::Debug for Sqs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sqs")
            .field("credentials", &self.credentials)
            .field("region", &self.region)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
