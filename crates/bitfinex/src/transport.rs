use std::time::Duration;

use async_trait::async_trait;
use interface::{ApiResponse, BfxError};

pub const BASE_URL: &str = "https://api.bitfinex.com";
pub const API_VERSION: &str = "/v1";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// 전송 계층에 넘기는 요청. 호출마다 새로 만들어지므로 이전 호출의 헤더가 남지 않는다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            headers: Vec::new(),
        }
    }

    pub fn post(url: impl Into<String>, headers: Vec<(String, String)>) -> Self {
        Self {
            method: Method::Post,
            url: url.into(),
            headers,
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// HTTP 교환을 수행하는 전송 계층. 테스트에서는 스텁으로 교체한다.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<ApiResponse, BfxError>;
}

/// reqwest 기반 전송 계층
#[derive(Clone)]
pub struct HttpTransport {
    // 클라이언트 생성 실패 시 이후 모든 호출이 전송 에러를 반환한다
    http: Result<reqwest::Client, String>,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::with_timeout(REQUEST_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                tracing::error!("Failed to initialize HTTP client: {}", e);
                e.to_string()
            });
        Self { http }
    }

    fn client(&self) -> Result<&reqwest::Client, BfxError> {
        self.http.as_ref().map_err(|e| {
            BfxError::Transport(format!("HTTP client not initialized: {}", e))
        })
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: HttpRequest) -> Result<ApiResponse, BfxError> {
        let http = self.client()?;

        let mut builder = match request.method {
            Method::Get => http.get(&request.url),
            // v1 인증 요청은 파라미터를 헤더로만 전달하고 본문은 비운다
            Method::Post => http.post(&request.url).body(""),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.send().await?;

        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::warn!(
                "Bitfinex API HTTP error: status {}, url: {}, response: {}",
                status,
                request.url,
                response_text.chars().take(200).collect::<String>()
            );
        }

        Ok(ApiResponse::new(status.as_u16(), response_text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_header_lookup_ignores_case() {
        let request = HttpRequest::post(
            "https://api.bitfinex.com/v1/balances/",
            vec![("X-BFX-APIKEY".to_string(), "key".to_string())],
        );
        assert_eq!(request.header("x-bfx-apikey"), Some("key"));
        assert_eq!(request.header("X-BFX-PAYLOAD"), None);
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let transport = HttpTransport::with_timeout(Duration::from_secs(2));
        let result = transport
            .execute(HttpRequest::get("http://127.0.0.1:1/v1/symbols"))
            .await;

        match result {
            Err(e) => assert!(e.is_transport(), "unexpected error: {:?}", e),
            Ok(resp) => panic!("expected transport error, got {:?}", resp),
        }
    }

    #[tokio::test]
    async fn test_uninitialized_client_fails_every_call() {
        let transport = HttpTransport {
            http: Err("tls backend unavailable".to_string()),
        };

        for _ in 0..2 {
            let err = transport
                .execute(HttpRequest::get("https://api.bitfinex.com/v1/symbols"))
                .await
                .unwrap_err();
            assert_eq!(err.code(), 1);
        }
    }
}
