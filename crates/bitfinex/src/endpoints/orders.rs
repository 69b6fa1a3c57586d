use interface::{ApiResponse, BfxError, NewOrder};
use serde_json::{Map, Value};

use crate::client::Fields;
use crate::BitfinexClient;

/// /order/new 선택 파라미터
#[derive(Debug, Clone, Copy, Default)]
pub struct NewOrderOptions {
    pub is_hidden: bool,
    pub is_postonly: bool,
    pub use_all_available: bool,
    pub ocoorder: bool,
    /// OCO 주문의 매수 가격
    pub buy_price_oco: f64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReplaceOrderOptions {
    pub is_hidden: bool,
    pub use_remaining: bool,
}

impl BitfinexClient {
    fn check_order(&self, order: &NewOrder) -> Result<(), BfxError> {
        self.allow.check_symbol(&order.symbol)?;
        self.allow.check_order_type(&order.order_type)
    }

    fn order_fields(order: &NewOrder) -> Fields {
        Fields::new()
            .with("symbol", order.symbol.as_str())
            .decimal("amount", order.amount)
            .decimal("price", order.price)
            .with("side", order.side.to_string())
            .with("type", order.order_type.as_str())
    }

    pub async fn new_order(
        &self,
        order: &NewOrder,
        options: NewOrderOptions,
    ) -> Result<ApiResponse, BfxError> {
        self.check_order(order)?;

        let fields = Self::order_fields(order)
            .with("is_hidden", options.is_hidden)
            .with("is_postonly", options.is_postonly)
            .with("use_all_available", options.use_all_available)
            .with("ocoorder", options.ocoorder)
            .decimal("buy_price_oco", options.buy_price_oco);
        self.post("/order/new", fields.into_map()).await
    }

    /// 여러 주문을 한 번에 제출. 하나라도 검증에 실패하면 아무것도 보내지 않는다.
    pub async fn new_orders(&self, orders: &[NewOrder]) -> Result<ApiResponse, BfxError> {
        for order in orders {
            self.check_order(order)?;
        }

        let orders = serde_json::to_value(orders)
            .map_err(|e| BfxError::Other(format!("Failed to serialize orders: {}", e)))?;
        let fields = Fields::new().with("orders", orders);
        self.post("/order/new/multi", fields.into_map()).await
    }

    pub async fn cancel_order(&self, order_id: u64) -> Result<ApiResponse, BfxError> {
        let fields = Fields::new().with("order_id", order_id);
        self.post("/order/cancel", fields.into_map()).await
    }

    pub async fn cancel_orders(&self, order_ids: &[u64]) -> Result<ApiResponse, BfxError> {
        let ids: Vec<Value> = order_ids.iter().map(|id| Value::from(*id)).collect();
        let fields = Fields::new().with("order_ids", ids);
        self.post("/order/cancel/multi", fields.into_map()).await
    }

    pub async fn cancel_all_orders(&self) -> Result<ApiResponse, BfxError> {
        self.post("/order/cancel/all", Map::new()).await
    }

    /// 기존 주문을 취소하고 같은 요청으로 새 주문을 넣는다
    pub async fn replace_order(
        &self,
        order_id: u64,
        order: &NewOrder,
        options: ReplaceOrderOptions,
    ) -> Result<ApiResponse, BfxError> {
        self.check_order(order)?;

        let order_fields = Self::order_fields(order).into_map();
        let mut fields = Fields::new().with("order_id", order_id).into_map();
        fields.extend(order_fields);
        fields.insert("is_hidden".to_string(), Value::Bool(options.is_hidden));
        fields.insert(
            "use_remaining".to_string(),
            Value::Bool(options.use_remaining),
        );
        self.post("/order/cancel/replace", fields).await
    }

    pub async fn get_order_status(&self, order_id: u64) -> Result<ApiResponse, BfxError> {
        let fields = Fields::new().with("order_id", order_id);
        self.post("/order/status", fields.into_map()).await
    }

    pub async fn get_active_orders(&self) -> Result<ApiResponse, BfxError> {
        self.post("/orders", Map::new()).await
    }

    /// 최근 체결/취소된 주문 (기본 50개)
    pub async fn get_orders_history(&self, limit: u32) -> Result<ApiResponse, BfxError> {
        let fields = Fields::new().with("limit", limit);
        self.post("/orders/hist", fields.into_map()).await
    }
}
