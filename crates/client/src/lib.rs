//! Billed HTTP Client
//!
//! A [`Store`] implementation talking to the Billed REST backend.
//!
//! # Quick Start
//!
//! ```no_run
//! use billed_client::BilledClient;
//! use billed_store::Store;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), billed_store::StoreError> {
//!     let client = BilledClient::builder("http://localhost:5678")
//!         .jwt("eyJhbGciOi...")
//!         .build()?;
//!
//!     for bill in client.bills().list().await? {
//!         println!("{} {}", bill.date, bill.name);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Routes
//!
//! - `GET /bills` lists bills
//! - `POST /bills` uploads a receipt (multipart `file` + `email`)
//! - `PATCH /bills/{key}` replaces a bill with a JSON body

mod error;

use std::time::Duration;

use async_trait::async_trait;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use tracing::debug;

use billed_core::{BillId, BillRecord};
use billed_store::{
    BillsResource, CreatedAttachment, RequestHeaders, Store, StoreError, UploadPayload,
};

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the Billed backend.
#[derive(Debug, Clone)]
pub struct BilledClient {
    client: Client,
    base_url: String,
    jwt: Option<String>,
}

/// Builder for configuring a [`BilledClient`].
#[derive(Debug)]
pub struct BilledClientBuilder {
    base_url: String,
    timeout: Duration,
    jwt: Option<String>,
    client: Option<Client>,
}

impl BilledClientBuilder {
    /// Create a new builder with the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
            jwt: None,
            client: None,
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the session token sent as a bearer credential.
    #[must_use]
    pub fn jwt(mut self, jwt: impl Into<String>) -> Self {
        self.jwt = Some(jwt.into());
        self
    }

    /// Use a custom reqwest Client.
    ///
    /// Useful for configuring TLS, proxies, or other advanced settings.
    #[must_use]
    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<BilledClient, StoreError> {
        let client = match self.client {
            Some(c) => c,
            None => Client::builder()
                .timeout(self.timeout)
                .build()
                .map_err(|e| StoreError::Configuration(e.to_string()))?,
        };

        Ok(BilledClient {
            client,
            base_url: self.base_url,
            jwt: self.jwt,
        })
    }
}

impl BilledClient {
    /// Create a new client with default configuration.
    pub fn new(base_url: impl Into<String>) -> Result<Self, StoreError> {
        BilledClientBuilder::new(base_url).build()
    }

    /// Create a builder for advanced configuration.
    pub fn builder(base_url: impl Into<String>) -> BilledClientBuilder {
        BilledClientBuilder::new(base_url)
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn bills_url(&self) -> String {
        format!("{}/bills", self.base_url)
    }

    fn bill_url(&self, selector: Option<&BillId>) -> String {
        match selector {
            Some(key) => format!(
                "{}/bills/{}",
                self.base_url,
                utf8_percent_encode(key.as_str(), NON_ALPHANUMERIC)
            ),
            None => self.bills_url(),
        }
    }

    /// Add the bearer token and, unless told otherwise, the JSON content type.
    fn prepare(&self, req: RequestBuilder, headers: RequestHeaders) -> RequestBuilder {
        let req = match &self.jwt {
            Some(jwt) => req.bearer_auth(jwt),
            None => req,
        };
        if headers.no_content_type {
            req
        } else {
            req.header(CONTENT_TYPE, "application/json")
        }
    }

    async fn send(&self, req: RequestBuilder) -> Result<reqwest::Response, StoreError> {
        let response = req.send().await.map_err(|e| error::transport(&e))?;
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(error::from_response(response).await)
        }
    }
}

impl Store for BilledClient {
    fn bills(&self) -> &dyn BillsResource {
        self
    }
}

#[async_trait]
impl BillsResource for BilledClient {
    async fn list(&self) -> Result<Vec<BillRecord>, StoreError> {
        let url = self.bills_url();
        debug!(%url, "listing bills");

        let response = self
            .send(self.prepare(self.client.get(&url), RequestHeaders::default()))
            .await?;
        response
            .json::<Vec<BillRecord>>()
            .await
            .map_err(|e| StoreError::Deserialization(e.to_string()))
    }

    async fn create(
        &self,
        payload: UploadPayload,
        headers: RequestHeaders,
    ) -> Result<CreatedAttachment, StoreError> {
        let url = self.bills_url();
        debug!(%url, file_name = %payload.file.file_name, "uploading receipt");

        let mut part =
            Part::bytes(payload.file.data.to_vec()).file_name(payload.file.file_name.clone());
        if let Some(content_type) = &payload.file.content_type {
            part = part
                .mime_str(content_type)
                .map_err(|e| StoreError::Serialization(format!("invalid mime type: {e}")))?;
        }

        let mut form = Form::new().part("file", part);
        for (name, value) in payload.fields {
            form = form.text(name, value);
        }

        let response = self
            .send(self.prepare(self.client.post(&url), headers).multipart(form))
            .await?;
        response
            .json::<CreatedAttachment>()
            .await
            .map_err(|e| StoreError::Deserialization(e.to_string()))
    }

    async fn update(
        &self,
        data: String,
        selector: Option<&BillId>,
    ) -> Result<serde_json::Value, StoreError> {
        let url = self.bill_url(selector);
        debug!(%url, "updating bill");

        let response = self
            .send(
                self.prepare(self.client.patch(&url), RequestHeaders::default())
                    .body(data),
            )
            .await?;

        let body = response
            .text()
            .await
            .map_err(|e| StoreError::Deserialization(e.to_string()))?;
        if body.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        serde_json::from_str(&body).map_err(|e| StoreError::Deserialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use billed_store::UploadFile;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    use super::*;

    /// A minimal mock HTTP server built on tokio that returns canned responses.
    struct MockBilledServer {
        listener: tokio::net::TcpListener,
        base_url: String,
    }

    impl MockBilledServer {
        async fn start() -> Self {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                .await
                .expect("failed to bind mock server");
            let port = listener.local_addr().unwrap().port();
            let base_url = format!("http://127.0.0.1:{port}");
            Self { listener, base_url }
        }

        /// Accept one connection, answer with `status_code` and `body`, and
        /// return the raw request that was received.
        async fn respond_once(self, status_code: u16, body: &str) -> String {
            let (mut stream, _) = self.listener.accept().await.unwrap();
            let request = read_request(&mut stream).await;

            let response = format!(
                "HTTP/1.1 {status_code} Mock\r\n\
                 Content-Type: application/json\r\n\
                 Content-Length: {}\r\n\
                 Connection: close\r\n\
                 \r\n\
                 {body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap();
            request
        }
    }

    /// Read a full HTTP/1.1 request: headers, then `Content-Length` bytes.
    async fn read_request(stream: &mut tokio::net::TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = stream.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&buf);
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if buf.len() >= header_end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn client_for(server: &MockBilledServer) -> BilledClient {
        BilledClient::builder(&server.base_url)
            .jwt("test-jwt")
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn list_returns_bills() {
        let server = MockBilledServer::start().await;
        let client = client_for(&server);

        let body = r#"[
            {"id":"1","date":"2022-01-01","status":"pending","amount":100},
            {"id":"2","date":"2022-03-01","status":"accepted","amount":"bad"}
        ]"#;
        let server_task = tokio::spawn(server.respond_once(200, body));

        let bills = client.bills().list().await.unwrap();
        assert_eq!(bills.len(), 2);
        assert_eq!(bills[0].id.as_deref(), Some("1"));
        assert_eq!(bills[0].amount, Some(100));
        assert_eq!(bills[1].amount, None);

        let request = server_task.await.unwrap();
        assert!(request.starts_with("GET /bills HTTP/1.1"));
        assert!(request.to_ascii_lowercase().contains("authorization: bearer test-jwt"));
    }

    #[tokio::test]
    async fn list_propagates_server_errors() {
        let server = MockBilledServer::start().await;
        let client = client_for(&server);
        let server_task = tokio::spawn(server.respond_once(500, r#"{"message":"Erreur 500"}"#));

        let err = client.bills().list().await.unwrap_err();
        match err {
            StoreError::Http { status, message } => {
                assert_eq!(status, 500);
                assert!(message.contains("Erreur 500"));
            }
            other => panic!("expected Http error, got {other:?}"),
        }
        server_task.await.unwrap();
    }

    #[tokio::test]
    async fn list_rejects_malformed_payload() {
        let server = MockBilledServer::start().await;
        let client = client_for(&server);
        let server_task = tokio::spawn(server.respond_once(200, r#"{"not":"a list"}"#));

        let err = client.bills().list().await.unwrap_err();
        assert!(matches!(err, StoreError::Deserialization(_)));
        server_task.await.unwrap();
    }

    #[tokio::test]
    async fn create_sends_multipart_upload() {
        let server = MockBilledServer::start().await;
        let client = client_for(&server);
        let server_task = tokio::spawn(
            server.respond_once(200, r#"{"filePath":"public/0a1b2c.png","key":"1234"}"#),
        );

        let payload = UploadPayload::new(
            UploadFile::new("receipt.png", b"png-bytes".to_vec()).with_content_type("image/png"),
        )
        .field("email", "test@test.com");
        let created = client
            .bills()
            .create(payload, RequestHeaders::raw_body())
            .await
            .unwrap();
        assert_eq!(created.file_path, "public/0a1b2c.png");
        assert_eq!(created.key.as_str(), "1234");

        let request = server_task.await.unwrap();
        let lower = request.to_ascii_lowercase();
        assert!(request.starts_with("POST /bills HTTP/1.1"));
        assert!(lower.contains("content-type: multipart/form-data; boundary="));
        assert!(!lower.contains("content-type: application/json"));
        assert!(request.contains("name=\"file\"; filename=\"receipt.png\""));
        assert!(request.contains("name=\"email\""));
        assert!(request.contains("test@test.com"));
        assert!(request.contains("png-bytes"));
    }

    #[tokio::test]
    async fn update_patches_bill_by_key() {
        let server = MockBilledServer::start().await;
        let client = client_for(&server);
        let server_task = tokio::spawn(server.respond_once(200, r#"{"id":"1234"}"#));

        let data = r#"{"name":"Taxi","status":"pending"}"#.to_string();
        let key = BillId::new("1234");
        let echoed = client.bills().update(data, Some(&key)).await.unwrap();
        assert_eq!(echoed["id"], "1234");

        let request = server_task.await.unwrap();
        assert!(request.starts_with("PATCH /bills/1234 HTTP/1.1"));
        assert!(request.to_ascii_lowercase().contains("content-type: application/json"));
        assert!(request.ends_with(r#"{"name":"Taxi","status":"pending"}"#));
    }

    #[tokio::test]
    async fn update_without_key_targets_collection() {
        let server = MockBilledServer::start().await;
        let client = client_for(&server);
        let server_task = tokio::spawn(server.respond_once(404, ""));

        let err = client.bills().update("{}".into(), None).await.unwrap_err();
        assert!(err.is_not_found());

        let request = server_task.await.unwrap();
        assert!(request.starts_with("PATCH /bills HTTP/1.1"));
    }

    #[tokio::test]
    async fn update_encodes_key() {
        let server = MockBilledServer::start().await;
        let client = client_for(&server);
        let server_task = tokio::spawn(server.respond_once(200, ""));

        let key = BillId::new("a/b c");
        let echoed = client.bills().update("{}".into(), Some(&key)).await.unwrap();
        assert!(echoed.is_null());

        let request = server_task.await.unwrap();
        assert!(request.starts_with("PATCH /bills/a%2Fb%20c HTTP/1.1"));
    }

    #[tokio::test]
    async fn unreachable_server_is_a_connection_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let client = BilledClient::new(format!("http://127.0.0.1:{port}/")).unwrap();
        assert_eq!(client.base_url(), format!("http://127.0.0.1:{port}"));

        let err = client.bills().list().await.unwrap_err();
        assert!(matches!(err, StoreError::Connection(_)));
    }
}
