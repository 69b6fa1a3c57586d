use std::path::PathBuf;

use thiserror::Error;

/// Bitfinex 클라이언트 공통 에러
///
/// 검증 에러는 네트워크 호출 전에 반환되고, 전송/응답 에러는 호출 후에 반환된다.
#[derive(Debug, Error)]
pub enum BfxError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// HTTP 클라이언트 초기화 실패 등 reqwest 밖에서 발생한 전송 에러
    #[error("transport error: {0}")]
    Transport(String),

    #[error("unknown symbol: {0}")]
    BadSymbol(String),

    #[error("unknown currency: {0}")]
    BadCurrency(String),

    #[error("unknown deposit method: {0}")]
    BadDepositMethod(String),

    #[error("unknown wallet type: {0}")]
    BadWalletType(String),

    #[error("withdraw config is missing required parameters: {}", .0.join(", "))]
    RequiredParamsMissing(Vec<String>),

    #[error("withdraw config is missing wire parameters: {}", .0.join(", "))]
    WireParamsMissing(Vec<String>),

    #[error("withdraw config is missing the address parameter")]
    AddressParamsMissing,

    #[error("unknown order type: {0}")]
    BadOrderType(String),

    /// /symbols 응답을 문자열 배열로 해석하지 못함
    #[error("failed to parse symbol list: {0}")]
    SymbolList(String),

    #[error("cannot read withdraw config {path}: {source}")]
    WithdrawConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON from {endpoint}: {message}")]
    ResponseParse {
        endpoint: String,
        message: String,
        body: String,
    },

    #[error("unexpected response shape from {endpoint}: {message}")]
    ResponseSchema {
        endpoint: String,
        message: String,
        body: String,
    },

    /// 거래소가 요청을 거절함 (non-2xx). 본문은 해석하지 않고 그대로 전달한다.
    #[error("API error: status {status}, response: {body}")]
    Api { status: u16, body: String },

    #[error("{0}")]
    Other(String),
}

impl BfxError {
    /// 호출자에게 노출되는 숫자 에러 코드 (0은 사용하지 않음)
    pub fn code(&self) -> u8 {
        match self {
            BfxError::Http(_) | BfxError::Transport(_) => 1,
            BfxError::BadSymbol(_) => 2,
            BfxError::BadCurrency(_) => 3,
            BfxError::BadDepositMethod(_) => 4,
            BfxError::BadWalletType(_) => 5,
            BfxError::RequiredParamsMissing(_) => 6,
            BfxError::WireParamsMissing(_) => 7,
            BfxError::AddressParamsMissing => 8,
            BfxError::BadOrderType(_) => 9,
            BfxError::SymbolList(_) => 10,
            BfxError::WithdrawConfig { .. } => 11,
            BfxError::ResponseParse { .. } => 12,
            BfxError::ResponseSchema { .. } => 13,
            BfxError::Api { .. } => 14,
            BfxError::Other(_) => 255,
        }
    }

    /// 네트워크 호출 없이 로컬에서 거절된 요청인지
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            BfxError::BadSymbol(_)
                | BfxError::BadCurrency(_)
                | BfxError::BadDepositMethod(_)
                | BfxError::BadWalletType(_)
                | BfxError::RequiredParamsMissing(_)
                | BfxError::WireParamsMissing(_)
                | BfxError::AddressParamsMissing
                | BfxError::BadOrderType(_)
                | BfxError::WithdrawConfig { .. }
        )
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, BfxError::Http(_) | BfxError::Transport(_))
    }

    /// 에러와 함께 수신된 응답 본문 (있는 경우)
    pub fn body(&self) -> Option<&str> {
        match self {
            BfxError::ResponseParse { body, .. }
            | BfxError::ResponseSchema { body, .. }
            | BfxError::Api { body, .. } => Some(body),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_follow_category() {
        assert_eq!(BfxError::Transport("down".into()).code(), 1);
        assert_eq!(BfxError::BadSymbol("foo".into()).code(), 2);
        assert_eq!(BfxError::AddressParamsMissing.code(), 8);
        assert_eq!(
            BfxError::Api {
                status: 400,
                body: "{}".into()
            }
            .code(),
            14
        );
    }

    #[test]
    fn test_validation_and_transport_are_disjoint() {
        let transport = BfxError::Transport("timeout".into());
        assert!(transport.is_transport());
        assert!(!transport.is_validation());

        let validation = BfxError::BadWalletType("savings".into());
        assert!(validation.is_validation());
        assert!(!validation.is_transport());
    }

    #[test]
    fn test_missing_params_message_lists_keys() {
        let err = BfxError::WireParamsMissing(vec!["bank_name".into(), "bank_city".into()]);
        assert_eq!(
            err.to_string(),
            "withdraw config is missing wire parameters: bank_name, bank_city"
        );
    }
}
