//! Shared test fixtures: a stub AEP endpoint serving canned responses.

#![allow(dead_code)]

use std::net::{SocketAddr, TcpListener};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use axum::Router;
use axum::body::Bytes;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use serde_json::{Value, json};

use aep_demo::config::ServerConfig;

/// Response the stub returns for every run request.
#[derive(Clone)]
pub enum Stub {
    /// 200 with this JSON body.
    Json(Value),
    /// This status with a plain-text body.
    Status(u16),
    /// 200 with this raw body, declared as JSON.
    Raw(&'static str),
}

/// Requests seen by a stub server.
#[derive(Default)]
pub struct Hits {
    /// Number of `POST /api/aep/run` requests.
    pub count: AtomicUsize,
    /// Total request body bytes received.
    pub body_bytes: AtomicUsize,
}

impl Hits {
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    pub fn body_bytes(&self) -> usize {
        self.body_bytes.load(Ordering::SeqCst)
    }
}

/// Scenario payload: mean 12.345, p50 12.1, p90 10.8, uncertainty 4.567, five iterations.
pub fn scenario_payload() -> Value {
    json!({
        "status": "success",
        "aep_GWh_mean": 12.345,
        "aep_GWh_p50": 12.1,
        "aep_GWh_p90": 10.8,
        "aep_GWh_p10": 13.9,
        "std_dev": 0.56,
        "uncertainty_pct": 4.567,
        "distribution": [1, 5, 9, 5, 1]
    })
}

/// Starts a stub server on an ephemeral port in a background thread.
///
/// Only `POST /api/aep/run` is routed; anything else is 404/405.
pub fn spawn_stub(stub: Stub) -> (SocketAddr, Arc<Hits>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("ephemeral port bind should succeed");
    listener
        .set_nonblocking(true)
        .expect("listener should switch to non-blocking");
    let addr = listener.local_addr().expect("local_addr should be available");

    let hits = Arc::new(Hits::default());
    let seen = Arc::clone(&hits);
    let app = Router::new().route(
        "/api/aep/run",
        post(move |body: Bytes| {
            let seen = Arc::clone(&seen);
            let stub = stub.clone();
            async move {
                seen.count.fetch_add(1, Ordering::SeqCst);
                seen.body_bytes.fetch_add(body.len(), Ordering::SeqCst);
                respond(stub)
            }
        }),
    );

    thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("stub runtime should build");
        rt.block_on(async move {
            let listener = tokio::net::TcpListener::from_std(listener)
                .expect("listener should convert to tokio");
            let _ = axum::serve(listener, app).await;
        });
    });

    (addr, hits)
}

fn respond(stub: Stub) -> Response {
    match stub {
        Stub::Json(value) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            value.to_string(),
        )
            .into_response(),
        Stub::Status(code) => {
            let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, "simulation exploded").into_response()
        }
        Stub::Raw(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response(),
    }
}

/// Server settings pointing at `addr`.
pub fn server_config(addr: SocketAddr) -> ServerConfig {
    ServerConfig {
        base_url: format!("http://{addr}"),
        ..ServerConfig::default()
    }
}

/// An address nothing is listening on.
pub fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").expect("ephemeral port bind should succeed");
    let addr = listener.local_addr().expect("local_addr should be available");
    drop(listener);
    addr
}
