//! 테스트용 전송 계층 스텁

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use interface::{ApiResponse, BfxError};
use serde_json::Value;

use crate::auth::HEADER_PAYLOAD;
use crate::transport::{HttpRequest, Transport};

/// 요청을 기록하고 미리 정한 응답을 돌려주는 스텁
pub(crate) struct RecordingTransport {
    requests: Mutex<Vec<HttpRequest>>,
    reply: Mutex<Result<ApiResponse, String>>,
}

impl RecordingTransport {
    pub(crate) fn ok(body: &str) -> Arc<Self> {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            reply: Mutex::new(Ok(ApiResponse::new(200, body))),
        })
    }

    pub(crate) fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            reply: Mutex::new(Err(message.to_string())),
        })
    }

    pub(crate) fn respond_with(&self, status: u16, body: &str) {
        *self.reply.lock().unwrap() = Ok(ApiResponse::new(status, body));
    }

    pub(crate) fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn last_request(&self) -> Option<HttpRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn execute(&self, request: HttpRequest) -> Result<ApiResponse, BfxError> {
        self.requests.lock().unwrap().push(request);
        self.reply
            .lock()
            .unwrap()
            .clone()
            .map_err(BfxError::Transport)
    }
}

/// X-BFX-PAYLOAD 헤더를 JSON 봉투로 복원
pub(crate) fn decode_envelope(request: &HttpRequest) -> Value {
    let payload = request
        .header(HEADER_PAYLOAD)
        .expect("POST request without payload header");
    let bytes = STANDARD.decode(payload).expect("payload is not base64");
    serde_json::from_slice(&bytes).expect("payload is not JSON")
}
