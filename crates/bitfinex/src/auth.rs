use std::env;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::Utc;
use hmac::{Hmac, Mac};
use interface::BfxError;
use sha2::Sha384;

pub const HEADER_APIKEY: &str = "X-BFX-APIKEY";
pub const HEADER_PAYLOAD: &str = "X-BFX-PAYLOAD";
pub const HEADER_SIGNATURE: &str = "X-BFX-SIGNATURE";

type HmacSha384 = Hmac<Sha384>;

/// API 키 쌍. 시크릿은 Debug 출력에서 가린다.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    pub api_secret: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    /// 환경변수(BFX_API_KEY, BFX_API_SECRET)에서 키 읽기
    pub fn from_env() -> Result<Self, BfxError> {
        let api_key = env::var("BFX_API_KEY")
            .map_err(|e| BfxError::Other(format!("BFX_API_KEY not found: {}", e)))?;
        let api_secret = env::var("BFX_API_SECRET")
            .map_err(|e| BfxError::Other(format!("BFX_API_SECRET not found: {}", e)))?;
        Ok(Self::new(api_key, api_secret))
    }

    pub fn is_empty(&self) -> bool {
        self.api_key.is_empty() || self.api_secret.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"***")
            .finish()
    }
}

/// 환경변수가 설정되어 있는지 확인
pub fn has_api_credentials() -> bool {
    env::var("BFX_API_KEY").is_ok() && env::var("BFX_API_SECRET").is_ok()
}

/// 현재 시각 (epoch 밀리초)
pub fn get_timestamp() -> u64 {
    Utc::now().timestamp_millis().max(0) as u64
}

/// 프로세스 전체가 공유하는 마지막 nonce
static LAST_NONCE: OnceLock<Arc<AtomicU64>> = OnceLock::new();

/// 밀리초 기반 nonce 발급기.
///
/// 시계가 같은 밀리초에 머물거나 뒤로 가도 직전 값 + 1을 발급한다.
/// `new()`로 만든 발급기는 모두 같은 카운터를 쓰므로, 같은 키로 여러 클라이언트를
/// 만들어도 프로세스 안에서 nonce가 반복되거나 감소하지 않는다.
#[derive(Debug, Clone)]
pub struct NonceGenerator {
    last: Arc<AtomicU64>,
}

impl NonceGenerator {
    pub fn new() -> Self {
        let last = LAST_NONCE.get_or_init(|| Arc::new(AtomicU64::new(0)));
        Self { last: last.clone() }
    }

    /// 공유 카운터와 분리된 발급기 (고정 시각으로 검증하는 테스트용)
    #[cfg(test)]
    fn isolated() -> Self {
        Self {
            last: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn next(&self) -> u64 {
        self.next_after(get_timestamp())
    }

    fn next_after(&self, now: u64) -> u64 {
        let mut last = self.last.load(Ordering::Acquire);
        loop {
            let candidate = now.max(last + 1);
            match self
                .last
                .compare_exchange_weak(last, candidate, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => return candidate,
                Err(actual) => last = actual,
            }
        }
    }
}

impl Default for NonceGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// 서명된 POST 요청 헤더 재료
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedPayload {
    /// 직렬화된 JSON 봉투의 Base64
    pub payload: String,
    /// payload에 대한 HMAC-SHA384 (소문자 hex)
    pub signature: String,
}

impl SignedPayload {
    /// JSON 봉투를 Base64로 인코딩하고 시크릿으로 서명
    pub fn sign(envelope: &str, api_secret: &str) -> Self {
        let payload = encode_payload(envelope);
        let signature = generate_signature(&payload, api_secret);
        Self { payload, signature }
    }

    pub fn headers(&self, api_key: &str) -> Vec<(String, String)> {
        vec![
            (HEADER_APIKEY.to_string(), api_key.to_string()),
            (HEADER_PAYLOAD.to_string(), self.payload.clone()),
            (HEADER_SIGNATURE.to_string(), self.signature.clone()),
        ]
    }
}

pub fn encode_payload(envelope: &str) -> String {
    STANDARD.encode(envelope.as_bytes())
}

/// Bitfinex v1 서명 생성
/// payload: Base64 인코딩된 요청 봉투
/// api_secret: API Secret Key
pub fn generate_signature(payload: &str, api_secret: &str) -> String {
    let mut mac =
        HmacSha384::new_from_slice(api_secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(payload.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_is_lowercase_sha384_hex() {
        let signature = generate_signature("eyJyZXF1ZXN0IjoiL3YxL2JhbGFuY2VzIn0=", "secret");
        assert_eq!(signature.len(), 96);
        assert!(signature
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn test_signature_known_vector() {
        // RFC 4231 test case 2
        let mut mac = HmacSha384::new_from_slice(b"Jefe").unwrap();
        mac.update(b"what do ya want for nothing?");
        let expected = hex::encode(mac.finalize().into_bytes());

        assert_eq!(
            generate_signature("what do ya want for nothing?", "Jefe"),
            expected
        );
        assert!(expected.starts_with("af45d2e376484031617f78d2b58a6b1b"));
    }

    #[test]
    fn test_signed_payload_roundtrips_envelope() {
        let envelope = r#"{"request":"/v1/balances","nonce":"1530620498412"}"#;
        let signed = SignedPayload::sign(envelope, "secret");

        let decoded = STANDARD.decode(&signed.payload).unwrap();
        assert_eq!(decoded, envelope.as_bytes());
        assert!(!signed.payload.contains('\n'));
        assert_eq!(signed.signature, generate_signature(&signed.payload, "secret"));
    }

    #[test]
    fn test_headers_carry_key_payload_signature() {
        let signed = SignedPayload::sign("{}", "secret");
        let headers = signed.headers("key");

        assert_eq!(headers.len(), 3);
        assert_eq!(headers[0], (HEADER_APIKEY.to_string(), "key".to_string()));
        assert_eq!(headers[1].1, signed.payload);
        assert_eq!(headers[2].1, signed.signature);
    }

    #[test]
    fn test_nonce_never_repeats_within_same_tick() {
        let nonce = NonceGenerator::isolated();
        let now = get_timestamp();

        let mut prev = 0;
        for _ in 0..1000 {
            let n = nonce.next_after(now);
            assert!(n > prev, "nonce must increase: {} -> {}", prev, n);
            prev = n;
        }
        assert_eq!(prev, now + 999);
    }

    #[test]
    fn test_nonce_survives_clock_going_backwards() {
        let nonce = NonceGenerator::isolated();
        let first = nonce.next_after(2_000);
        let second = nonce.next_after(1_000);
        assert_eq!(first, 2_000);
        assert_eq!(second, 2_001);
    }

    #[test]
    fn test_nonce_from_wall_clock_is_monotonic() {
        let nonce = NonceGenerator::new();
        let mut prev = nonce.next();
        for _ in 0..1000 {
            let n = nonce.next();
            assert!(n > prev);
            prev = n;
        }
    }

    #[test]
    fn test_separate_generators_never_share_a_nonce() {
        let handles: Vec<_> = (0..2)
            .map(|_| {
                std::thread::spawn(|| {
                    let nonce = NonceGenerator::new();
                    (0..2000).map(|_| nonce.next()).collect::<Vec<u64>>()
                })
            })
            .collect();

        let mut all: Vec<u64> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        let total = all.len();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), total);
    }

    #[test]
    fn test_credentials_debug_hides_secret() {
        let creds = Credentials::new("key", "super-secret");
        let printed = format!("{:?}", creds);
        assert!(printed.contains("key"));
        assert!(!printed.contains("super-secret"));
    }
}
