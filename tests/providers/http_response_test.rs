//! HTTP response sanitization and truncation tests.

use langbot::providers::{check_http_response, sanitize_http_error_body, ProviderError};

use crate::support::serve_once;

async fn fetch_error(body: &str) -> ProviderError {
    let (url, _request) = serve_once("500 Internal Server Error", body).await;

    let response = match reqwest::get(url).await {
        Ok(response) => response,
        Err(err) => panic!("request should complete: {err}"),
    };

    match check_http_response(response).await {
        Ok(_) => panic!("response should fail on non-success status"),
        Err(err) => err,
    }
}

#[tokio::test]
async fn check_http_response_redacts_gemini_key() {
    let raw_key = "AIzaSyA1234567890abcdefghijklmnopqrstu";
    let err = fetch_error(&format!("API key not valid: {raw_key}")).await;

    match err {
        ProviderError::HttpStatus { status, body } => {
            assert_eq!(status, 500);
            assert!(!body.contains(raw_key));
            assert!(body.contains("[REDACTED]"));
        }
        other => panic!("expected http status error, got: {other}"),
    }
}

#[tokio::test]
async fn check_http_response_truncates_long_error_body() {
    let err = fetch_error(&"x".repeat(400)).await;

    match err {
        ProviderError::HttpStatus { body, .. } => {
            assert!(body.ends_with("...[truncated]"));
        }
        other => panic!("expected http status error, got: {other}"),
    }
}

#[tokio::test]
async fn check_http_response_returns_body_on_success() {
    let (url, _request) = serve_once("200 OK", "{\"ok\":true}").await;
    let response = reqwest::get(url).await.expect("request should complete");
    let body = check_http_response(response).await.expect("2xx should pass");
    assert_eq!(body, "{\"ok\":true}");
}

#[test]
fn sanitize_collapses_whitespace() {
    assert_eq!(sanitize_http_error_body("a \n\t b"), "a b");
}

#[test]
fn sanitize_redacts_oauth_token() {
    let token = "ya29.abcdefghijklmnopqrstuvwxyz";
    let sanitized = sanitize_http_error_body(&format!("bearer {token}"));
    assert_eq!(sanitized, "bearer [REDACTED]");
}
