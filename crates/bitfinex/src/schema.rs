//! 엔드포인트 응답 형태 검증
//!
//! API 변경(drift)을 잡기 위한 진단용 훅이다. 클라이언트에 `ResponseValidator`를
//! 설치하면 성공(2xx)한 모든 응답(GET, 인증 POST)마다 호출된다.

use interface::BfxError;
use serde_json::Value;

/// 응답 본문 검증 훅
pub trait ResponseValidator: Send + Sync {
    /// endpoint: "/pubticker/btcusd" 같은 버전 접두사 없는 경로
    fn validate(&self, endpoint: &str, body: &str) -> Result<(), BfxError>;
}

/// 기대하는 JSON 형태
#[derive(Debug)]
pub enum Shape {
    Any,
    Str,
    /// 문자열 또는 숫자 (거래소가 숫자를 문자열로 내려주는 필드)
    Scalar,
    Number,
    Bool,
    ArrayOf(&'static Shape),
    Object(&'static [(&'static str, Shape)]),
}

static TICKER_FIELDS: [(&str, Shape); 8] = [
    ("mid", Shape::Scalar),
    ("bid", Shape::Scalar),
    ("ask", Shape::Scalar),
    ("last_price", Shape::Scalar),
    ("low", Shape::Scalar),
    ("high", Shape::Scalar),
    ("volume", Shape::Scalar),
    ("timestamp", Shape::Scalar),
];
static TICKER: Shape = Shape::Object(&TICKER_FIELDS);

static STAT_FIELDS: [(&str, Shape); 2] = [("period", Shape::Number), ("volume", Shape::Scalar)];
static STAT: Shape = Shape::Object(&STAT_FIELDS);
static STATS: Shape = Shape::ArrayOf(&STAT);

static BOOK_ENTRY_FIELDS: [(&str, Shape); 3] = [
    ("price", Shape::Scalar),
    ("amount", Shape::Scalar),
    ("timestamp", Shape::Scalar),
];
static BOOK_ENTRY: Shape = Shape::Object(&BOOK_ENTRY_FIELDS);
static BOOK_FIELDS: [(&str, Shape); 2] = [
    ("bids", Shape::ArrayOf(&BOOK_ENTRY)),
    ("asks", Shape::ArrayOf(&BOOK_ENTRY)),
];
static BOOK: Shape = Shape::Object(&BOOK_FIELDS);

static TRADE_FIELDS: [(&str, Shape); 6] = [
    ("timestamp", Shape::Scalar),
    ("tid", Shape::Scalar),
    ("price", Shape::Scalar),
    ("amount", Shape::Scalar),
    ("exchange", Shape::Str),
    ("type", Shape::Str),
];
static TRADE: Shape = Shape::Object(&TRADE_FIELDS);
static TRADES: Shape = Shape::ArrayOf(&TRADE);

static LENDBOOK_ENTRY_FIELDS: [(&str, Shape); 5] = [
    ("rate", Shape::Scalar),
    ("amount", Shape::Scalar),
    ("period", Shape::Scalar),
    ("timestamp", Shape::Scalar),
    ("frr", Shape::Str),
];
static LENDBOOK_ENTRY: Shape = Shape::Object(&LENDBOOK_ENTRY_FIELDS);
static LENDBOOK_FIELDS: [(&str, Shape); 2] = [
    ("bids", Shape::ArrayOf(&LENDBOOK_ENTRY)),
    ("asks", Shape::ArrayOf(&LENDBOOK_ENTRY)),
];
static LENDBOOK: Shape = Shape::Object(&LENDBOOK_FIELDS);

static LEND_FIELDS: [(&str, Shape); 4] = [
    ("rate", Shape::Scalar),
    ("amount_lent", Shape::Scalar),
    ("amount_used", Shape::Scalar),
    ("timestamp", Shape::Scalar),
];
static LEND: Shape = Shape::Object(&LEND_FIELDS);
static LENDS: Shape = Shape::ArrayOf(&LEND);

static STRING: Shape = Shape::Str;
static SYMBOLS: Shape = Shape::ArrayOf(&STRING);

static SYMBOL_DETAIL_FIELDS: [(&str, Shape); 7] = [
    ("pair", Shape::Str),
    ("price_precision", Shape::Number),
    ("initial_margin", Shape::Scalar),
    ("minimum_margin", Shape::Scalar),
    ("maximum_order_size", Shape::Scalar),
    ("minimum_order_size", Shape::Scalar),
    ("expiration", Shape::Any),
];
static SYMBOL_DETAIL: Shape = Shape::Object(&SYMBOL_DETAIL_FIELDS);
static SYMBOLS_DETAILS: Shape = Shape::ArrayOf(&SYMBOL_DETAIL);

static BALANCE_FIELDS: [(&str, Shape); 4] = [
    ("type", Shape::Str),
    ("currency", Shape::Str),
    ("amount", Shape::Scalar),
    ("available", Shape::Scalar),
];
static BALANCE: Shape = Shape::Object(&BALANCE_FIELDS);
static BALANCES: Shape = Shape::ArrayOf(&BALANCE);

static ORDER_FIELDS: [(&str, Shape); 11] = [
    ("id", Shape::Number),
    ("symbol", Shape::Str),
    ("price", Shape::Scalar),
    ("side", Shape::Str),
    ("type", Shape::Str),
    ("timestamp", Shape::Scalar),
    ("is_live", Shape::Bool),
    ("is_cancelled", Shape::Bool),
    ("original_amount", Shape::Scalar),
    ("remaining_amount", Shape::Scalar),
    ("executed_amount", Shape::Scalar),
];
static ORDER: Shape = Shape::Object(&ORDER_FIELDS);
static ORDERS: Shape = Shape::ArrayOf(&ORDER);

static POSITION_FIELDS: [(&str, Shape); 7] = [
    ("id", Shape::Number),
    ("symbol", Shape::Str),
    ("status", Shape::Str),
    ("base", Shape::Scalar),
    ("amount", Shape::Scalar),
    ("timestamp", Shape::Scalar),
    ("pl", Shape::Scalar),
];
static POSITION: Shape = Shape::Object(&POSITION_FIELDS);
static POSITIONS: Shape = Shape::ArrayOf(&POSITION);

static LEDGER_ENTRY_FIELDS: [(&str, Shape); 5] = [
    ("currency", Shape::Str),
    ("amount", Shape::Scalar),
    ("balance", Shape::Scalar),
    ("description", Shape::Str),
    ("timestamp", Shape::Scalar),
];
static LEDGER_ENTRY: Shape = Shape::Object(&LEDGER_ENTRY_FIELDS);
static HISTORY: Shape = Shape::ArrayOf(&LEDGER_ENTRY);

static MOVEMENT_FIELDS: [(&str, Shape); 7] = [
    ("id", Shape::Number),
    ("currency", Shape::Str),
    ("method", Shape::Str),
    ("type", Shape::Str),
    ("amount", Shape::Scalar),
    ("status", Shape::Str),
    ("timestamp", Shape::Scalar),
];
static MOVEMENT: Shape = Shape::Object(&MOVEMENT_FIELDS);
static MOVEMENTS: Shape = Shape::ArrayOf(&MOVEMENT);

static MY_TRADE_FIELDS: [(&str, Shape); 7] = [
    ("price", Shape::Scalar),
    ("amount", Shape::Scalar),
    ("timestamp", Shape::Scalar),
    ("type", Shape::Str),
    ("fee_currency", Shape::Str),
    ("fee_amount", Shape::Scalar),
    ("tid", Shape::Number),
];
static MY_TRADE: Shape = Shape::Object(&MY_TRADE_FIELDS);
static MY_TRADES: Shape = Shape::ArrayOf(&MY_TRADE);

static OFFER_FIELDS: [(&str, Shape); 6] = [
    ("id", Shape::Number),
    ("currency", Shape::Str),
    ("rate", Shape::Scalar),
    ("period", Shape::Number),
    ("direction", Shape::Str),
    ("timestamp", Shape::Scalar),
];
static OFFER: Shape = Shape::Object(&OFFER_FIELDS);
static OFFERS: Shape = Shape::ArrayOf(&OFFER);

static CREDIT_FIELDS: [(&str, Shape); 6] = [
    ("id", Shape::Number),
    ("currency", Shape::Str),
    ("status", Shape::Str),
    ("rate", Shape::Scalar),
    ("period", Shape::Number),
    ("amount", Shape::Scalar),
];
static CREDIT: Shape = Shape::Object(&CREDIT_FIELDS);
static CREDITS: Shape = Shape::ArrayOf(&CREDIT);

/// 엔드포인트 경로 → 기대 형태 매핑을 가진 기본 검증기
#[derive(Debug, Default, Clone, Copy)]
pub struct ShapeValidator;

impl ShapeValidator {
    pub fn new() -> Self {
        Self
    }

    /// 인증 엔드포인트는 전체 경로로, 파라미터가 붙는 공개 엔드포인트는
    /// 첫 세그먼트로 형태를 찾는다 ("/order/status" → 주문, "/book/btcusd" → book)
    pub fn shape_for(endpoint: &str) -> Option<&'static Shape> {
        let path = endpoint
            .trim_start_matches('/')
            .split('?')
            .next()
            .unwrap_or_default()
            .trim_end_matches('/');

        match path {
            "balances" => Some(&BALANCES),
            "orders" | "orders/hist" => Some(&ORDERS),
            "order/new" | "order/status" | "order/cancel" | "order/cancel/replace" => {
                Some(&ORDER)
            }
            "positions" => Some(&POSITIONS),
            "history" => Some(&HISTORY),
            "history/movements" => Some(&MOVEMENTS),
            "mytrades" => Some(&MY_TRADES),
            "offers" | "offers/hist" => Some(&OFFERS),
            "offer/new" | "offer/status" | "offer/cancel" => Some(&OFFER),
            "credits" => Some(&CREDITS),
            "symbols" => Some(&SYMBOLS),
            "symbols_details" => Some(&SYMBOLS_DETAILS),
            _ => match path.split('/').next().unwrap_or_default() {
                "pubticker" => Some(&TICKER),
                "stats" => Some(&STATS),
                "book" => Some(&BOOK),
                "trades" => Some(&TRADES),
                "lendbook" => Some(&LENDBOOK),
                "lends" => Some(&LENDS),
                _ => None,
            },
        }
    }
}

impl ResponseValidator for ShapeValidator {
    fn validate(&self, endpoint: &str, body: &str) -> Result<(), BfxError> {
        let Some(shape) = Self::shape_for(endpoint) else {
            return Ok(());
        };

        let value: Value = serde_json::from_str(body).map_err(|e| BfxError::ResponseParse {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
            body: body.to_string(),
        })?;

        check(shape, &value, "$").map_err(|message| {
            tracing::warn!("Unexpected response shape from {}: {}", endpoint, message);
            BfxError::ResponseSchema {
                endpoint: endpoint.to_string(),
                message,
                body: body.to_string(),
            }
        })
    }
}

fn check(shape: &Shape, value: &Value, pointer: &str) -> Result<(), String> {
    match shape {
        Shape::Any => Ok(()),
        Shape::Str => match value {
            Value::String(_) => Ok(()),
            other => Err(format!("{}: expected string, found {}", pointer, kind(other))),
        },
        Shape::Number => match value {
            Value::Number(_) => Ok(()),
            other => Err(format!("{}: expected number, found {}", pointer, kind(other))),
        },
        Shape::Bool => match value {
            Value::Bool(_) => Ok(()),
            other => Err(format!("{}: expected bool, found {}", pointer, kind(other))),
        },
        Shape::Scalar => match value {
            Value::String(_) | Value::Number(_) => Ok(()),
            other => Err(format!(
                "{}: expected string or number, found {}",
                pointer,
                kind(other)
            )),
        },
        Shape::ArrayOf(item) => match value {
            Value::Array(items) => items
                .iter()
                .enumerate()
                .try_for_each(|(i, v)| check(item, v, &format!("{}[{}]", pointer, i))),
            other => Err(format!("{}: expected array, found {}", pointer, kind(other))),
        },
        Shape::Object(fields) => match value {
            Value::Object(map) => fields.iter().try_for_each(|(name, field_shape)| {
                let path = format!("{}.{}", pointer, name);
                match map.get(*name) {
                    Some(v) => check(field_shape, v, &path),
                    None => Err(format!("{}: missing", path)),
                }
            }),
            other => Err(format!("{}: expected object, found {}", pointer, kind(other))),
        },
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
