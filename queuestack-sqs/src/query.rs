//! Query pipeline: resolve target, sign, execute, decode

use queuestack_auth::Signer;
use queuestack_core::{Credentials, ParameterMap, ServiceError};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::DecodeError;
use crate::transport::{HttpResponse, Transport};
use crate::SqsError;

const METHOD: &str = "GET";

/// Where a request goes and what the signer sees as host and path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTarget {
    pub url: Url,
    pub host: String,
    pub path: String,
}

impl RequestTarget {
    /// Resolve the target of a call.
    ///
    /// Service-level calls (`queue_url == None`) go to the endpoint with path
    /// `/`. Queue-level calls go to the queue URL; the path is the queue URL with
    /// the endpoint prefix removed.
    pub fn resolve(endpoint: &str, queue_url: Option<&str>) -> Result<Self, SqsError> {
        let (url, path) = match queue_url {
            Some(queue_url) => {
                let url = parse_url(queue_url)?;
                let path = queue_path(endpoint, queue_url).unwrap_or_else(|| url.path().to_string());
                (url, path)
            }
            None => (parse_url(endpoint)?, "/".to_string()),
        };

        let host = match (url.host_str(), url.port()) {
            (Some(host), Some(port)) => format!("{}:{}", host, port),
            (Some(host), None) => host.to_string(),
            (None, _) => return Err(SqsError::MissingHost(url.to_string())),
        };

        Ok(Self { url, host, path })
    }
}

fn parse_url(raw: &str) -> Result<Url, SqsError> {
    Url::parse(raw).map_err(|source| SqsError::InvalidUrl {
        url: raw.to_string(),
        source,
    })
}

/// The queue URL minus the endpoint prefix, keeping the leading slash
fn queue_path(endpoint: &str, queue_url: &str) -> Option<String> {
    let rest = queue_url.strip_prefix(endpoint.trim_end_matches('/'))?;
    if rest.is_empty() {
        Some("/".to_string())
    } else if rest.starts_with('/') {
        Some(rest.to_string())
    } else {
        None
    }
}

/// Everything a call needs from the service handle
pub(crate) struct QueryContext<'a> {
    pub endpoint: &'a str,
    pub credentials: &'a Credentials,
    pub signer: &'a dyn Signer,
    pub transport: &'a dyn Transport,
    pub debug: bool,
}

/// Sign `params` for the resolved target and issue the GET
pub(crate) fn execute(
    ctx: &QueryContext<'_>,
    queue_url: Option<&str>,
    mut params: ParameterMap,
) -> Result<HttpResponse, SqsError> {
    let RequestTarget {
        mut url,
        host,
        path,
    } = RequestTarget::resolve(ctx.endpoint, queue_url)?;

    let action = params.get("Action").cloned().unwrap_or_default();
    debug!(action = %action, host = %host, path = %path, "SQS request");

    ctx.signer
        .sign(ctx.credentials, METHOD, &path, &host, &mut params)?;

    url.query_pairs_mut().clear().extend_pairs(params.iter());

    if ctx.debug {
        info!(url = %url, "GET");
    }

    let response = ctx.transport.get(&url)?;

    if ctx.debug {
        info!(
            status = %response.status_line,
            body = %String::from_utf8_lossy(&response.body),
            "Response"
        );
    }

    Ok(response)
}

/// Map a response to the typed result, or to a service error for non-200 replies
pub(crate) fn decode<T: DeserializeOwned>(response: HttpResponse) -> Result<T, SqsError> {
    if response.status != 200 {
        let err = ServiceError::from_response(response.status, &response.status_line, &response.body);
        warn!(
            status = err.status_code,
            code = %err.code,
            request_id = %err.request_id,
            "SQS error response"
        );
        return Err(err.into());
    }

    let body = std::str::from_utf8(&response.body).map_err(DecodeError::from)?;
    Ok(crate::response::from_xml(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::{CreateQueueResponse, MetadataResponse, ReceiveMessageResponse};

    #[test]
    fn test_queue_path_derivation() {
        let target = RequestTarget::resolve("https://endpoint", Some("https://endpoint/123/myqueue")).unwrap();
        assert_eq!(target.path, "/123/myqueue");
        assert_eq!(target.host, "endpoint");
        assert_eq!(target.url.as_str(), "https://endpoint/123/myqueue");
    }

    #[test]
    fn test_service_level_path() {
        let target = RequestTarget::resolve("https://sqs.us-east-1.amazonaws.com", None).unwrap();
        assert_eq!(target.path, "/");
        assert_eq!(target.host, "sqs.us-east-1.amazonaws.com");
    }

    #[test]
    fn test_endpoint_with_trailing_slash() {
        let target = RequestTarget::resolve("https://endpoint/", Some("https://endpoint/123/q")).unwrap();
        assert_eq!(target.path, "/123/q");
    }

    #[test]
    fn test_foreign_queue_url_uses_own_path() {
        let target = RequestTarget::resolve(
            "https://sqs.us-east-1.amazonaws.com",
            Some("http://localhost:4566/000000000000/q1"),
        )
        .unwrap();
        assert_eq!(target.path, "/000000000000/q1");
        assert_eq!(target.host, "localhost:4566");
    }

    #[test]
    fn test_invalid_queue_url() {
        let err = RequestTarget::resolve("https://endpoint", Some("not a url")).unwrap_err();
        assert!(matches!(err, SqsError::InvalidUrl { .. }));
    }

    #[test]
    fn test_decode_success() {
        let response = HttpResponse::new(
            200,
            "<CreateQueueResponse><CreateQueueResult><QueueUrl>https://endpoint/1/q</QueueUrl>\
             </CreateQueueResult></CreateQueueResponse>",
        );
        let resp: CreateQueueResponse = decode(response).unwrap();
        assert_eq!(resp.create_queue_result.queue_url, "https://endpoint/1/q");
    }

    #[test]
    fn test_decode_keeps_body_whitespace() {
        let response = HttpResponse::new(
            200,
            "<ReceiveMessageResponse>\n  <ReceiveMessageResult>\n    <Message>\
             <MessageId>m1</MessageId><ReceiptHandle>rh</ReceiptHandle>\
             <MD5OfBody>fc2908013ebf400498656097e2c82708</MD5OfBody>\
             <Body>  padded body\n</Body></Message>\n  </ReceiveMessageResult>\n\
             </ReceiveMessageResponse>",
        );
        let resp: ReceiveMessageResponse = decode(response).unwrap();
        assert_eq!(resp.messages()[0].body, "  padded body\n");
        assert!(resp.messages()[0].verify_md5());
    }

    #[test]
    fn test_decode_malformed_success_body() {
        let response = HttpResponse::new(200, "<CreateQueueResponse><CreateQueueResult>");
        let err = decode::<CreateQueueResponse>(response).unwrap_err();
        assert!(matches!(err, SqsError::Decode(_)));
    }

    #[test]
    fn test_decode_non_utf8_success_body() {
        let response = HttpResponse::new(200, vec![0xff, 0xfe, 0xfd]);
        let err = decode::<MetadataResponse>(response).unwrap_err();
        assert!(matches!(err, SqsError::Decode(DecodeError::Utf8(_))));
    }

    #[test]
    fn test_decode_error_status() {
        let response = HttpResponse::new(
            400,
            "<ErrorResponse><Error><Code>AWS.SimpleQueueService.NonExistentQueue</Code>\
             <Message>The specified queue does not exist.</Message></Error>\
             <RequestId>abc</RequestId></ErrorResponse>",
        );
        let err = decode::<MetadataResponse>(response).unwrap_err();
        let service = err.service_error().unwrap();
        assert_eq!(service.status_code, 400);
        assert_eq!(service.code, "AWS.SimpleQueueService.NonExistentQueue");
        assert_eq!(service.request_id, "abc");
    }

    #[test]
    fn test_non_200_success_status_is_an_error() {
        let response = HttpResponse::new(204, "");
        let err = decode::<MetadataResponse>(response).unwrap_err();
        let service = err.service_error().unwrap();
        assert_eq!(service.status_code, 204);
        assert_eq!(service.message, "204 No Content");
    }
}
