//! HTTP utilities shared by the service clients
//!
//! One `reqwest::Client` is built per process and cloned into each adapter.
//! No timeout and no retry are configured: every call blocks until the
//! round-trip completes or fails.

use crate::error::{DigestError, Result};
use reqwest::{Client, Response};
use tracing::debug;

/// User agent sent with every outbound request
pub const USER_AGENT: &str = concat!("paper-digest/", env!("CARGO_PKG_VERSION"));

/// Build the shared HTTP client
pub fn build_client() -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| DigestError::config(format!("Failed to create HTTP client: {}", e)))
}

/// Read the body of a response, turning a non-success status into an error
///
/// # Arguments
/// * `service` - Name of the service for error context
/// * `resp` - The response to consume
///
/// # Returns
/// * `Ok(body)` - Body text of a 2xx response
/// * `Err(DigestError::Status)` - Status and body text of anything else
pub async fn success_body(service: &'static str, resp: Response) -> Result<String> {
    let status = resp.status();
    let body = resp
        .text()
        .await
        .map_err(|e| DigestError::request(service, e))?;

    debug!("{} responded {} ({} bytes)", service, status, body.len());

    if !status.is_success() {
        return Err(DigestError::Status {
            service,
            status: status.as_u16(),
            body: truncate_for_log(&body, 500),
        });
    }

    Ok(body)
}

/// Cut a string to at most `max_chars` characters, marking the cut
pub fn truncate_for_log(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_truncate_for_log() {
        assert_eq!(truncate_for_log("short", 10), "short");
        assert_eq!(truncate_for_log("abcdef", 3), "abc...");
        // Multi-byte characters are not split
        assert_eq!(truncate_for_log("推荐系统", 2), "推荐...");
    }

    #[test]
    fn test_client_creation() {
        assert!(build_client().is_ok());
    }

    #[tokio::test]
    async fn test_success_body_sends_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ok"))
            .and(header("user-agent", USER_AGENT))
            .respond_with(ResponseTemplate::new(200).set_body_string("fine"))
            .expect(1)
            .mount(&server)
            .await;

        let client = build_client().unwrap();
        let resp = client.get(format!("{}/ok", server.uri())).send().await.unwrap();
        assert_eq!(success_body("test", resp).await.unwrap(), "fine");
    }

    #[tokio::test]
    async fn test_success_body_rejects_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not here"))
            .mount(&server)
            .await;

        let client = build_client().unwrap();
        let resp = client
            .get(format!("{}/missing", server.uri()))
            .send()
            .await
            .unwrap();

        match success_body("test", resp).await {
            Err(DigestError::Status { status, body, .. }) => {
                assert_eq!(status, 404);
                assert_eq!(body, "not here");
            }
            other => panic!("Expected status error, got {:?}", other),
        }
    }
}
