//! Local stand-in for the accounts and Web API hosts.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::{
    Router,
    body::to_bytes,
    extract::Request,
    http::{StatusCode, header},
    response::IntoResponse,
};
use spotify_sdk::{
    accounts::{Accounts, ClientCredentials, Endpoints, ScopeSet, Session, TokenSet},
    sdk::Sdk,
};
use tokio::net::TcpListener;

/// One request as the stub saw it.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub content_length: Option<String>,
    pub body: String,
}

impl Recorded {
    /// First value of `key` in the query string.
    pub fn query_param(&self, key: &str) -> Option<String> {
        let query = self.query.as_deref()?;
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }

    /// First value of `key` in a form-encoded body.
    pub fn form_param(&self, key: &str) -> Option<String> {
        url::form_urlencoded::parse(self.body.as_bytes())
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

pub struct Stub {
    pub base_url: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl Stub {
    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn accounts(&self) -> Arc<Accounts> {
        Arc::new(
            Accounts::new(ClientCredentials::new(
                "client-id",
                "client-secret",
                "http://127.0.0.1:8888/callback",
            ))
            .unwrap()
            .with_endpoints(Endpoints::new(&self.base_url, &self.base_url)),
        )
    }

    pub fn session(&self, access_token: &str, refresh_token: Option<&str>) -> Session {
        Session::from_token_set(
            self.accounts(),
            TokenSet::new(
                access_token,
                Some(3600),
                refresh_token.map(str::to_string),
                ScopeSet::parse("user-read-private user-read-email"),
            ),
        )
    }

    pub fn sdk(&self, access_token: &str) -> Sdk {
        Sdk::new(Arc::new(self.session(access_token, None)))
    }
}

/// Serves every request with `respond`, which gets the recorded request and
/// returns a status and a body (empty for no content).
pub async fn serve<F>(respond: F) -> Stub
where
    F: Fn(&Recorded) -> (u16, String) + Send + Sync + 'static,
{
    let requests: Arc<Mutex<Vec<Recorded>>> = Arc::default();
    let respond = Arc::new(respond);
    let log = Arc::clone(&requests);

    let app = Router::new().fallback(move |request: Request| {
        let respond = Arc::clone(&respond);
        let log = Arc::clone(&log);
        async move {
            let (parts, body) = request.into_parts();
            let header_value = |name: header::HeaderName| {
                parts
                    .headers
                    .get(name)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string)
            };
            let recorded = Recorded {
                method: parts.method.to_string(),
                path: parts.uri.path().to_string(),
                query: parts.uri.query().map(str::to_string),
                authorization: header_value(header::AUTHORIZATION),
                content_length: header_value(header::CONTENT_LENGTH),
                body: String::from_utf8(to_bytes(body, usize::MAX).await.unwrap().to_vec())
                    .unwrap(),
            };
            let (status, body) = respond(&recorded);
            log.lock().unwrap().push(recorded);
            (
                StatusCode::from_u16(status).unwrap(),
                [(header::CONTENT_TYPE, "application/json")],
                body,
            )
                .into_response()
        }
    });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Stub {
        base_url: format!("http://{addr}"),
        requests,
    }
}

/// A base URL nobody listens on.
pub async fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

pub fn ok(body: serde_json::Value) -> (u16, String) {
    (200, body.to_string())
}

pub fn no_content() -> (u16, String) {
    (204, String::new())
}
