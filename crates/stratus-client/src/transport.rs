//! HTTP/1.1 transport for backend requests.
//!
//! One connection per request: TCP connect, http1 handshake, drive the
//! connection in a background task, send, collect the body. The
//! backend is a single co-located service, so connection pooling buys
//! nothing here.

use std::time::Duration;

use bytes::Bytes;
use http::{Method, Request, Uri};
use http_body_util::{BodyExt, Full};
use tracing::debug;

use crate::error::{ClientError, ClientResult};

/// Parsed backend address: authority only, scheme must be http.
#[derive(Debug, Clone)]
pub(crate) struct Endpoint {
    pub authority: String,
}

impl Endpoint {
    pub fn parse(base_url: &str) -> ClientResult<Self> {
        let uri: Uri = base_url
            .parse()
            .map_err(|e: http::uri::InvalidUri| ClientError::BaseUrl(base_url.to_string(), e.to_string()))?;
        match uri.scheme_str() {
            Some("http") | None => {}
            Some(other) => {
                return Err(ClientError::BaseUrl(
                    base_url.to_string(),
                    format!("unsupported scheme {other:?}"),
                ));
            }
        }
        let authority = uri
            .authority()
            .ok_or_else(|| {
                ClientError::BaseUrl(base_url.to_string(), "missing host".to_string())
            })?
            .to_string();
        Ok(Self { authority })
    }
}

/// Issue one request and return the response body.
///
/// Non-2xx responses are errors; the body is discarded.
pub(crate) async fn request(
    endpoint: &Endpoint,
    method: Method,
    path: &str,
    body: Option<Bytes>,
    content_type: &str,
    timeout: Duration,
) -> ClientResult<Bytes> {
    let fut = send(endpoint, method, path, body, content_type);
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => Err(ClientError::Timeout {
            path: path.to_string(),
        }),
    }
}

async fn send(
    endpoint: &Endpoint,
    method: Method,
    path: &str,
    body: Option<Bytes>,
    content_type: &str,
) -> ClientResult<Bytes> {
    let stream = tokio::net::TcpStream::connect(&endpoint.authority)
        .await
        .map_err(|e| ClientError::Connect(endpoint.authority.clone(), e.to_string()))?;

    let io = hyper_util::rt::TokioIo::new(stream);
    let (mut sender, conn) = hyper::client::conn::http1::handshake(io)
        .await
        .map_err(|e| ClientError::Connect(endpoint.authority.clone(), e.to_string()))?;

    // Drive the connection in the background.
    tokio::spawn(async move {
        let _ = conn.await;
    });

    let uri = format!("http://{}{}", endpoint.authority, path);
    let mut builder = Request::builder()
        .method(method.clone())
        .uri(&uri)
        .header("host", &endpoint.authority)
        .header("user-agent", "stratus-client/0.1")
        .header("accept", "application/json");
    if body.is_some() {
        builder = builder.header("content-type", content_type);
    }
    let req = builder
        .body(Full::new(body.unwrap_or_default()))
        .map_err(|e| ClientError::Request {
            path: path.to_string(),
            reason: e.to_string(),
        })?;

    debug!(%method, %uri, "backend request");

    let resp = sender
        .send_request(req)
        .await
        .map_err(|e| ClientError::Request {
            path: path.to_string(),
            reason: e.to_string(),
        })?;

    let status = resp.status();
    if !status.is_success() {
        return Err(ClientError::Status {
            path: path.to_string(),
            status: status.as_u16(),
        });
    }

    let collected = resp
        .into_body()
        .collect()
        .await
        .map_err(|e| ClientError::Request {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
    Ok(collected.to_bytes())
}
