use std::path::{Path, PathBuf};
use std::sync::Arc;

use interface::{ApiResponse, BfxError};
use serde_json::{Map, Value};

use crate::auth::{Credentials, NonceGenerator, SignedPayload};
use crate::schema::ResponseValidator;
use crate::transport::{HttpRequest, HttpTransport, Transport, API_VERSION, BASE_URL};
use crate::validation::{parse_symbol_list, AllowLists};
use crate::withdraw::DEFAULT_WITHDRAW_CONF_PATH;

/// Bitfinex v1 REST 클라이언트
///
/// 모든 엔드포인트는 `&self`로 호출되며 결과를 `Result<ApiResponse, BfxError>`로 돌려준다.
/// 클라이언트 내부에 "마지막 응답" 같은 상태는 두지 않는다.
#[derive(Clone)]
pub struct BitfinexClient {
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) credentials: Credentials,
    pub(crate) nonce: Arc<NonceGenerator>,
    pub(crate) allow: AllowLists,
    pub(crate) validator: Option<Arc<dyn ResponseValidator>>,
    pub(crate) withdraw_conf_path: PathBuf,
    base_url: String,
}

impl BitfinexClient {
    /// 공개 API만 사용하는 경우
    pub fn new() -> Self {
        Self {
            transport: Arc::new(HttpTransport::new()),
            credentials: Credentials::default(),
            nonce: Arc::new(NonceGenerator::new()),
            allow: AllowLists::default(),
            validator: None,
            withdraw_conf_path: PathBuf::from(DEFAULT_WITHDRAW_CONF_PATH),
            base_url: BASE_URL.to_string(),
        }
    }

    /// 인증이 필요한 API를 사용하는 경우 (환경변수에서 키를 읽음)
    pub fn with_credentials() -> Result<Self, BfxError> {
        let credentials = Credentials::from_env()?;
        Ok(Self::new().with_keys(credentials))
    }

    pub fn with_keys(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = transport;
        self
    }

    /// 성공한 응답마다 호출할 형태 검증기 설치
    pub fn with_validator(mut self, validator: Arc<dyn ResponseValidator>) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn with_allow_lists(mut self, allow: AllowLists) -> Self {
        self.allow = allow;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn set_keys(&mut self, api_key: impl Into<String>, api_secret: impl Into<String>) {
        self.credentials = Credentials::new(api_key, api_secret);
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn allow_lists(&self) -> &AllowLists {
        &self.allow
    }

    pub fn set_withdraw_conf_path(&mut self, path: impl Into<PathBuf>) {
        self.withdraw_conf_path = path.into();
    }

    pub fn withdraw_conf_path(&self) -> &Path {
        &self.withdraw_conf_path
    }

    /// /symbols 응답으로 심볼 허용 목록을 교체한다. 생성 직후 한 번 호출하는 용도.
    pub async fn load_symbols(&mut self) -> Result<usize, BfxError> {
        let response = self.get_symbols().await?.error_for_status()?;
        let symbols = parse_symbol_list(&response.body)?;
        let count = symbols.len();

        self.allow = self.allow.clone().with_symbols(symbols);
        tracing::info!("Loaded {} Bitfinex symbols", count);
        Ok(count)
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, API_VERSION, path)
    }

    /// 공개 GET 요청. 쿼리 파라미터는 주어진 순서대로 인코딩된다.
    pub(crate) async fn get(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<ApiResponse, BfxError> {
        let mut url = self.url(path);
        if !query.is_empty() {
            let encoded = serde_urlencoded::to_string(query)
                .map_err(|e| BfxError::Other(format!("Failed to encode query: {}", e)))?;
            url.push('?');
            url.push_str(&encoded);
        }
        tracing::debug!("GET {}", url);

        let response = self.transport.execute(HttpRequest::get(url)).await?;
        self.check_shape(path, response)
    }

    /// 인증 POST 요청.
    ///
    /// `{request, nonce, ...fields}` 봉투를 Base64로 인코딩해 헤더로만 전달하고
    /// HTTP 본문은 비운다 (v1 인증 방식).
    pub(crate) async fn post(
        &self,
        path: &str,
        fields: Map<String, Value>,
    ) -> Result<ApiResponse, BfxError> {
        let envelope = self.envelope(path, fields);
        let body = serde_json::to_string(&envelope)
            .map_err(|e| BfxError::Other(format!("Failed to serialize request: {}", e)))?;
        tracing::debug!("POST {} payload: {}", path, body);

        if self.credentials.is_empty() {
            tracing::warn!("Signing {} without API credentials", path);
        }

        let signed = SignedPayload::sign(&body, &self.credentials.api_secret);
        let url = format!("{}/", self.url(path));
        let request = HttpRequest::post(url, signed.headers(&self.credentials.api_key));

        let response = self.transport.execute(request).await?;
        self.check_shape(path, response)
    }

    /// 검증기가 설치되어 있으면 성공(2xx) 응답 본문을 검사한다
    fn check_shape(&self, path: &str, response: ApiResponse) -> Result<ApiResponse, BfxError> {
        if let Some(validator) = &self.validator {
            if response.is_success() {
                validator.validate(path, &response.body)?;
            }
        }
        Ok(response)
    }

    fn envelope(&self, path: &str, fields: Map<String, Value>) -> Map<String, Value> {
        let mut envelope = Map::new();
        envelope.insert(
            "request".to_string(),
            Value::String(format!("{}{}", API_VERSION, path)),
        );
        envelope.insert(
            "nonce".to_string(),
            Value::String(self.nonce.next().to_string()),
        );
        envelope.extend(fields);
        envelope
    }
}

impl Default for BitfinexClient {
    fn default() -> Self {
        Self::new()
    }
}

/// 봉투 필드를 순서대로 모으는 헬퍼
#[derive(Debug, Default)]
pub(crate) struct Fields(Map<String, Value>);

impl Fields {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    /// 금액/가격/이율은 문자열로 보낸다
    pub(crate) fn decimal(self, key: &str, value: f64) -> Self {
        self.with(key, value.to_string())
    }

    /// 0/1 정수 플래그
    pub(crate) fn flag(self, key: &str, value: bool) -> Self {
        self.with(key, u8::from(value))
    }

    pub(crate) fn into_map(self) -> Map<String, Value> {
        self.0
    }
}
