use std::fmt;

use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OrderSide::Buy => "buy",
            OrderSide::Sell => "sell",
        };
        f.write_str(s)
    }
}

/// 마진 펀딩 오퍼 방향
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OfferDirection {
    Lend,
    Loan,
}

impl fmt::Display for OfferDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OfferDirection::Lend => "lend",
            OfferDirection::Loan => "loan",
        };
        f.write_str(s)
    }
}

/// 다중 주문(/order/new/multi)의 개별 주문
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewOrder {
    pub symbol: String,
    #[serde(serialize_with = "decimal_string")]
    pub amount: f64,
    #[serde(serialize_with = "decimal_string")]
    pub price: f64,
    pub side: OrderSide,
    /// 주문 타입 (예: "exchange limit")
    #[serde(rename = "type")]
    pub order_type: String,
}

impl NewOrder {
    pub fn new(
        symbol: impl Into<String>,
        amount: f64,
        price: f64,
        side: OrderSide,
        order_type: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            amount,
            price,
            side,
            order_type: order_type.into(),
        }
    }
}

/// 거래소는 금액/가격을 문자열로 받는다
pub fn decimal_string<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_string())
}
