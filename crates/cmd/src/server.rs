// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! HTTP front end: content listings and the signup endpoint.

use crate::config::{ConfigError, SiteConfig};
use bytes::Bytes;
use content::{Category, ContentRepository};
use diagnostics::*;
use http_body_util::{BodyExt, Full, Limited};
use hyper::body::Incoming;
use hyper::header::{self, HeaderMap, HeaderValue};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use serde::{Deserialize, Serialize};
use serde_json::json;
use signup::{Provenance, SignupOutcome, SignupStore, SiteId, StoreError};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

const MAX_BODY_BYTES: usize = 16 * 1024;

pub const INVALID_EMAIL_MESSAGE: &str = "Please provide a valid email address";
pub const DUPLICATE_MESSAGE: &str = "This email is already registered";
pub const FAILURE_MESSAGE: &str = "Failed to process signup. Please try again.";

/// Shared state for request handlers.
pub struct AppState {
    pub site: SiteId,
    pub content: ContentRepository,
    pub signups: SignupStore,
    pub store_timeout: Duration,
}

impl AppState {
    pub fn from_config(config: &SiteConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            site: config.site_id()?,
            content: ContentRepository::new(config.content.clone()),
            signups: SignupStore::new(config.signups.open()?),
            store_timeout: config.signups.timeout(),
        })
    }
}

#[derive(Deserialize)]
struct SignupRequest {
    email: String,
}

/// Bind `listen` and serve until the process is stopped.
pub async fn run(state: Arc<AppState>, listen: SocketAddr) -> anyhow::Result<()> {
    let listener = TcpListener::bind(listen).await?;
    let site = state.site.to_string();
    let addr = listener.local_addr()?.to_string();
    info!("Serving site {site} on {addr}", site: site, addr: addr);
    serve(state, listener).await
}

/// Accept connections on a bound listener until the process is stopped.
pub async fn serve(state: Arc<AppState>, listener: TcpListener) -> anyhow::Result<()> {
    loop {
        match listener.accept().await {
            Ok((stream, peer)) => {
                let state = Arc::clone(&state);
                _ = tokio::spawn(async move {
                    let io = TokioIo::new(stream);
                    let service = service_fn(move |req| {
                        let state = Arc::clone(&state);
                        async move { handle_request(state, peer, req).await }
                    });

                    if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                        let peer = peer.to_string();
                        let reason = err.to_string();
                        warn!("Error serving connection from {peer}: {reason}", peer: peer, reason: reason);
                    }
                });
            }
            Err(e) => {
                let e = e.to_string();
                error!("Error accepting connection: {e}", e: e);
            }
        }
    }
}

async fn handle_request(
    state: Arc<AppState>,
    peer: SocketAddr,
    req: Request<Incoming>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let provenance = provenance_from(req.headers(), Some(peer));

    {
        let method = method.to_string();
        let path = path.clone();
        let ip = provenance.ip.clone();
        debug!("{ip} {method} {path}", ip: ip, method: method, path: path);
    }

    let body = match Limited::new(req.into_body(), MAX_BODY_BYTES).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(_) => return Ok(error_response(StatusCode::BAD_REQUEST, "Request body too large or unreadable")),
    };

    Ok(dispatch(&state, &method, &path, &body, &provenance).await)
}

/// First `X-Forwarded-For` entry, else the peer address; `User-Agent` as
/// sent.
pub fn provenance_from(headers: &HeaderMap, peer: Option<SocketAddr>) -> Provenance {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string);
    let ip = forwarded.or_else(|| peer.map(|p| p.ip().to_string()));
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok());
    Provenance::new(ip.as_deref(), user_agent)
}

/// Route one request. Transport-independent so it can be driven directly.
pub async fn dispatch(
    state: &AppState,
    method: &Method,
    path: &str,
    body: &[u8],
    provenance: &Provenance,
) -> Response<Full<Bytes>> {
    let path = match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    };

    match (method, path) {
        (&Method::OPTIONS, _) => preflight_response(),
        (&Method::GET, "/health") => json_response(StatusCode::OK, &json!({"status": "ok"})),
        (&Method::POST, "/api/signup") => signup_submit(state, body, provenance).await,
        (&Method::GET, "/api/signup") => signup_count(state).await,
        (&Method::GET, _) => content_route(state, path).await,
        _ => not_found_response(),
    }
}

async fn signup_submit(state: &AppState, body: &[u8], provenance: &Provenance) -> Response<Full<Bytes>> {
    let request: SignupRequest = match serde_json::from_slice(body) {
        Ok(request) => request,
        Err(_) => return error_response(StatusCode::BAD_REQUEST, INVALID_EMAIL_MESSAGE),
    };

    let submitted = tokio::time::timeout(
        state.store_timeout,
        state.signups.submit(&state.site, &request.email, provenance),
    )
    .await
    .unwrap_or(Err(StoreError::Timeout(state.store_timeout)));

    match submitted {
        Ok(SignupOutcome::Accepted) => json_response(StatusCode::OK, &json!({"success": true})),
        Ok(SignupOutcome::AlreadyRegistered) => {
            error_response(StatusCode::CONFLICT, DUPLICATE_MESSAGE)
        }
        Ok(SignupOutcome::Invalid(reason)) => {
            let reason = reason.to_string();
            debug!("Rejected signup: {reason}", reason: reason);
            error_response(StatusCode::BAD_REQUEST, INVALID_EMAIL_MESSAGE)
        }
        Err(e) => {
            let e = e.to_string();
            error!("Signup failed: {e}", e: e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, FAILURE_MESSAGE)
        }
    }
}

async fn signup_count(state: &AppState) -> Response<Full<Bytes>> {
    let count = tokio::time::timeout(state.store_timeout, state.signups.count(&state.site))
        .await
        .unwrap_or_else(|_| {
            warn!("Signup count timed out");
            0
        });
    json_response(StatusCode::OK, &json!({"count": count}))
}

async fn content_route(state: &AppState, path: &str) -> Response<Full<Bytes>> {
    let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();
    match segments.as_slice() {
        [segment] => match Category::from_url_segment(segment) {
            Some(category) => {
                let items = state.content.list_items(category).await;
                json_response(StatusCode::OK, &*items)
            }
            None => not_found_response(),
        },
        [segment, slug] => {
            let Some(category) = Category::from_url_segment(segment) else {
                return not_found_response();
            };
            match state.content.get_item(category, slug).await {
                Some(item) => json_response(StatusCode::OK, &item),
                None => not_found_response(),
            }
        }
        _ => not_found_response(),
    }
}

fn with_common_headers(mut response: Response<Full<Bytes>>, status: StatusCode) -> Response<Full<Bytes>> {
    *response.status_mut() = status;
    let headers = response.headers_mut();
    _ = headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    _ = headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    response
}

fn json_response<T: Serialize + ?Sized>(status: StatusCode, body: &T) -> Response<Full<Bytes>> {
    match serde_json::to_vec(body) {
        Ok(bytes) => with_common_headers(Response::new(Full::new(Bytes::from(bytes))), status),
        Err(e) => {
            let e = e.to_string();
            error!("Cannot encode response: {e}", e: e);
            with_common_headers(
                Response::new(Full::new(Bytes::from_static(b"{\"error\":\"Internal Server Error\"}"))),
                StatusCode::INTERNAL_SERVER_ERROR,
            )
        }
    }
}

fn error_response(status: StatusCode, message: &str) -> Response<Full<Bytes>> {
    json_response(status, &json!({"error": message}))
}

fn not_found_response() -> Response<Full<Bytes>> {
    error_response(StatusCode::NOT_FOUND, "Not Found")
}

fn preflight_response() -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::new()));
    let headers = response.headers_mut();
    _ = headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    _ = headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static("*"));
    _ = headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provenance_prefers_forwarded_for() {
        let mut headers = HeaderMap::new();
        _ = headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.5, 10.0.0.1"));
        _ = headers.insert(header::USER_AGENT, HeaderValue::from_static("curl/8.0"));
        let peer: SocketAddr = "127.0.0.1:5000".parse().expect("addr");

        let p = provenance_from(&headers, Some(peer));
        assert_eq!(p.ip, "203.0.113.5");
        assert_eq!(p.user_agent, "curl/8.0");
    }

    #[test]
    fn test_provenance_falls_back_to_peer() {
        let peer: SocketAddr = "192.0.2.1:4000".parse().expect("addr");
        let p = provenance_from(&HeaderMap::new(), Some(peer));
        assert_eq!(p.ip, "192.0.2.1");
        assert_eq!(p.user_agent, signup::UNKNOWN);

        assert_eq!(provenance_from(&HeaderMap::new(), None).ip, signup::UNKNOWN);
    }
}
