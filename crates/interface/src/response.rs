use serde::de::DeserializeOwned;

use crate::BfxError;

/// 엔드포인트 호출 결과. 본문은 해석하지 않은 원문 그대로 보관한다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// non-2xx 응답을 `BfxError::Api`로 변환
    pub fn error_for_status(self) -> Result<Self, BfxError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(BfxError::Api {
                status: self.status,
                body: self.body,
            })
        }
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, BfxError> {
        serde_json::from_str(&self.body).map_err(|e| {
            BfxError::Other(format!(
                "Failed to parse response: {}, response: {}",
                e,
                self.body.chars().take(200).collect::<String>()
            ))
        })
    }
}
