use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use interface::BfxError;
use serde_json::{Map, Value};

use crate::validation::{AllowLists, WIRE};

pub const DEFAULT_WITHDRAW_CONF_PATH: &str = "config/withdraw.conf";

const REQUIRED_KEYS: &[&str] = &["withdraw_type", "walletselected", "amount"];
const WIRE_KEYS: &[&str] = &[
    "account_number",
    "bank_name",
    "bank_address",
    "bank_city",
    "bank_country",
];
const ADDRESS_KEY: &str = "address";

/// withdraw.conf의 `key = value` 파라미터
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WithdrawConfig {
    params: BTreeMap<String, Value>,
}

impl WithdrawConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BfxError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| BfxError::WithdrawConfig {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&text))
    }

    /// 첫 글자가 알파벳이 아닌 줄(주석, 빈 줄)과 `key = value` 형식이 아닌 줄은 무시한다.
    /// 빈 문자열 값(`""`)인 키도 무시한다.
    pub fn parse(text: &str) -> Self {
        let mut params = BTreeMap::new();

        for line in text.lines() {
            if !line.chars().next().is_some_and(|c| c.is_ascii_alphabetic()) {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            if key.is_empty() || key.contains(char::is_whitespace) {
                continue;
            }
            if let Some(value) = parse_value(value.trim()) {
                params.insert(key.to_string(), value);
            }
        }

        Self { params }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.params.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    pub fn withdraw_type(&self) -> Option<&str> {
        self.get("withdraw_type").and_then(|v| v.as_str())
    }

    /// 출금 유형별 필수 키 확인. 네트워크 호출 전에 수행한다.
    pub fn validate(&self, lists: &AllowLists) -> Result<(), BfxError> {
        let missing = self.missing(REQUIRED_KEYS);
        if !missing.is_empty() {
            return Err(BfxError::RequiredParamsMissing(missing));
        }

        match self.withdraw_type() {
            Some(WIRE) => {
                let missing = self.missing(WIRE_KEYS);
                if !missing.is_empty() {
                    return Err(BfxError::WireParamsMissing(missing));
                }
            }
            Some(method) if lists.is_deposit_method(method) => {
                if !self.contains(ADDRESS_KEY) {
                    return Err(BfxError::AddressParamsMissing);
                }
            }
            _ => {}
        }

        Ok(())
    }

    fn missing(&self, keys: &[&str]) -> Vec<String> {
        keys.iter()
            .filter(|k| !self.contains(k))
            .map(|k| k.to_string())
            .collect()
    }

    /// 요청 봉투에 합칠 필드
    pub fn into_fields(self) -> Map<String, Value> {
        self.params.into_iter().collect()
    }
}

fn parse_value(raw: &str) -> Option<Value> {
    if raw.is_empty() || raw == "\"\"" {
        return None;
    }

    if let Some(inner) = raw
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    {
        return Some(Value::String(inner.to_string()));
    }

    match serde_json::from_str::<Value>(raw) {
        Ok(v @ (Value::Number(_) | Value::Bool(_))) => Some(v),
        _ => Some(Value::String(raw.to_string())),
    }
}
