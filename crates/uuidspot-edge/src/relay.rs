//! Single-attempt forwarding to the analytics upstream.
//!
//! The relay presents the analytics collector under the site's own origin:
//! one outbound request per inbound request, body streamed back verbatim,
//! no retry and no caching. Transport failures collapse to a generic 500
//! so upstream detail never reaches the client.

use std::net::SocketAddr;

use axum::body::Body;
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use http::{HeaderMap, HeaderValue, Method, StatusCode};

/// Headers that should NOT be forwarded (hop-by-hop headers).
const HOP_BY_HOP_HEADERS: &[&str] = &[
    "host",
    "connection",
    "transfer-encoding",
    "keep-alive",
    "upgrade",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailers",
];

/// Upstream response headers dropped before relaying back: server-identifying
/// headers, plus encoding/length since the body is re-streamed.
const STRIPPED_RESPONSE_HEADERS: &[&str] =
    &["server", "x-powered-by", "content-encoding", "content-length"];

/// Fixed body for relay transport failures.
const RELAY_FAILURE_BODY: &str = "Error proxying request";

/// Forward one request to the upstream URL and stream the response back.
///
/// `peer_addr` is the observed connection address, used for the
/// forwarded-client-IP header when the inbound request carries none.
pub async fn forward(
    client: &reqwest::Client,
    method: Method,
    url: &str,
    headers: &HeaderMap,
    body: Bytes,
    peer_addr: Option<SocketAddr>,
) -> Response {
    let mut req_builder = client.request(method.clone(), url);

    // Body omitted entirely for GET/HEAD.
    if method != Method::GET && method != Method::HEAD {
        req_builder = req_builder.body(body);
    }

    // Forward non-hop-by-hop headers from the original request
    for (name, value) in headers.iter() {
        let name_str = name.as_str().to_lowercase();
        if HOP_BY_HOP_HEADERS.contains(&name_str.as_str()) {
            continue;
        }
        // Skip accept-encoding so the upstream replies unencoded; the body
        // is re-streamed without decoding.
        if name_str == "accept-encoding" {
            continue;
        }
        // Skip content-length — reqwest sets it from the actual body
        if name_str == "content-length" {
            continue;
        }
        // Skip x-forwarded-for (set below)
        if name_str == "x-forwarded-for" {
            continue;
        }
        req_builder = req_builder.header(name, value);
    }

    // Prefer a forwarded-IP header already present on the inbound request,
    // else the observed peer address, else empty.
    let forwarded_for = headers
        .get("x-forwarded-for")
        .cloned()
        .or_else(|| {
            peer_addr.and_then(|addr| HeaderValue::from_str(&addr.ip().to_string()).ok())
        })
        .unwrap_or_else(|| HeaderValue::from_static(""));
    req_builder = req_builder.header("x-forwarded-for", forwarded_for);

    let upstream_result = req_builder.send().await;

    build_response(upstream_result, &method, url)
}

/// Build an axum Response from the upstream reqwest result, streaming the
/// body verbatim.
fn build_response(
    upstream_result: Result<reqwest::Response, reqwest::Error>,
    method: &Method,
    url: &str,
) -> Response {
    let upstream_resp = match upstream_result {
        Ok(resp) => resp,
        Err(e) => {
            tracing::error!(error = %e, method = %method, url = %url, "Analytics relay failed");
            return (StatusCode::INTERNAL_SERVER_ERROR, RELAY_FAILURE_BODY).into_response();
        }
    };

    let status = upstream_resp.status();
    tracing::debug!(
        method = %method,
        url = %url,
        status = status.as_u16(),
        "Relay complete"
    );

    let mut response_builder = Response::builder()
        .status(StatusCode::from_u16(status.as_u16()).unwrap_or(StatusCode::BAD_GATEWAY));

    // Relay upstream response headers, minus hop-by-hop and stripped ones
    for (name, value) in upstream_resp.headers().iter() {
        let name_str = name.as_str().to_lowercase();
        if HOP_BY_HOP_HEADERS.contains(&name_str.as_str()) {
            continue;
        }
        if STRIPPED_RESPONSE_HEADERS.contains(&name_str.as_str()) {
            continue;
        }
        response_builder = response_builder.header(name, value);
    }

    // Keep crawlers away from relayed analytics resources
    response_builder = response_builder.header("x-robots-tag", "noindex, nofollow");

    let body = Body::from_stream(upstream_resp.bytes_stream());

    response_builder.body(body).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to build relay response");
        (StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response()
    })
}
