use interface::{ApiResponse, BfxError, OfferDirection};
use serde_json::Map;

use crate::auth::get_timestamp;
use crate::client::Fields;
use crate::BitfinexClient;

#[derive(Debug, Clone, Copy)]
pub struct FundingTradesParams {
    /// 없으면 현재 시각(ms)
    pub until: Option<u64>,
    pub limit_trades: u32,
}

impl Default for FundingTradesParams {
    fn default() -> Self {
        Self {
            until: None,
            limit_trades: 50,
        }
    }
}

impl BitfinexClient {
    /// 펀딩 오퍼 생성
    /// rate: 연이율(%) / period: 일 단위 (2~30)
    pub async fn new_offer(
        &self,
        currency: &str,
        amount: f64,
        rate: f64,
        period: u32,
        direction: OfferDirection,
    ) -> Result<ApiResponse, BfxError> {
        self.allow.check_currency(currency)?;

        let fields = Fields::new()
            .with("currency", currency)
            .decimal("amount", amount)
            .decimal("rate", rate)
            .with("period", period)
            .with("direction", direction.to_string());
        self.post("/offer/new", fields.into_map()).await
    }

    pub async fn cancel_offer(&self, offer_id: u64) -> Result<ApiResponse, BfxError> {
        let fields = Fields::new().with("offer_id", offer_id);
        self.post("/offer/cancel", fields.into_map()).await
    }

    pub async fn get_offer_status(&self, offer_id: u64) -> Result<ApiResponse, BfxError> {
        let fields = Fields::new().with("offer_id", offer_id);
        self.post("/offer/status", fields.into_map()).await
    }

    pub async fn get_active_credits(&self) -> Result<ApiResponse, BfxError> {
        self.post("/credits", Map::new()).await
    }

    pub async fn get_offers(&self) -> Result<ApiResponse, BfxError> {
        self.post("/offers", Map::new()).await
    }

    pub async fn get_offers_history(&self, limit: u32) -> Result<ApiResponse, BfxError> {
        let fields = Fields::new().with("limit", limit);
        self.post("/offers/hist", fields.into_map()).await
    }

    /// 펀딩 체결 내역. 거래소가 통화를 "symbol" 키로 받는다.
    pub async fn get_past_funding_trades(
        &self,
        currency: &str,
        params: FundingTradesParams,
    ) -> Result<ApiResponse, BfxError> {
        self.allow.check_currency(currency)?;

        let fields = Fields::new()
            .with("symbol", currency)
            .with("until", params.until.unwrap_or_else(get_timestamp))
            .with("limit_trades", params.limit_trades);
        self.post("/mytrades_funding", fields.into_map()).await
    }

    pub async fn get_taken_funds(&self) -> Result<ApiResponse, BfxError> {
        self.post("/taken_funds", Map::new()).await
    }

    pub async fn get_unused_taken_funds(&self) -> Result<ApiResponse, BfxError> {
        self.post("/unused_taken_funds", Map::new()).await
    }

    pub async fn get_total_taken_funds(&self) -> Result<ApiResponse, BfxError> {
        self.post("/total_taken_funds", Map::new()).await
    }

    pub async fn close_loan(&self, swap_id: u64) -> Result<ApiResponse, BfxError> {
        let fields = Fields::new().with("swap_id", swap_id);
        self.post("/funding/close", fields.into_map()).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::Value;

    use super::*;
    use crate::testing::{decode_envelope, RecordingTransport};

    fn client(transport: &Arc<RecordingTransport>) -> BitfinexClient {
        BitfinexClient::new().with_transport(transport.clone())
    }

    #[tokio::test]
    async fn test_new_offer_fields() {
        let transport = RecordingTransport::ok("{}");
        client(&transport)
            .new_offer("USD", 100.0, 12.5, 2, OfferDirection::Lend)
            .await
            .unwrap();

        let envelope = decode_envelope(&transport.last_request().unwrap());
        assert_eq!(envelope["request"], "/v1/offer/new");
        assert_eq!(envelope["currency"], "USD");
        assert_eq!(envelope["amount"], "100");
        assert_eq!(envelope["rate"], "12.5");
        assert_eq!(envelope["period"], 2);
        assert_eq!(envelope["direction"], "lend");
    }

    #[tokio::test]
    async fn test_currency_validation_makes_no_call() {
        let transport = RecordingTransport::ok("{}");
        let client = client(&transport);

        assert!(matches!(
            client
                .new_offer("DOGE", 1.0, 1.0, 2, OfferDirection::Loan)
                .await,
            Err(BfxError::BadCurrency(_))
        ));
        assert!(matches!(
            client
                .get_past_funding_trades("DOGE", FundingTradesParams::default())
                .await,
            Err(BfxError::BadCurrency(_))
        ));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_past_funding_trades_sends_currency_as_symbol() {
        let transport = RecordingTransport::ok("[]");
        client(&transport)
            .get_past_funding_trades(
                "USD",
                FundingTradesParams {
                    until: Some(1530000000),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let envelope = decode_envelope(&transport.last_request().unwrap());
        assert_eq!(envelope["request"], "/v1/mytrades_funding");
        assert_eq!(envelope["symbol"], "USD");
        assert!(envelope.get("currency").is_none());
        assert_eq!(envelope["until"], 1530000000u64);
        assert_eq!(envelope["limit_trades"], 50);
    }

    #[tokio::test]
    async fn test_funding_paths_and_ids() {
        let transport = RecordingTransport::ok("[]");
        let client = client(&transport);

        client.cancel_offer(12345).await.unwrap();
        client.get_offer_status(12345).await.unwrap();
        client.get_active_credits().await.unwrap();
        client.get_offers().await.unwrap();
        client.get_offers_history(50).await.unwrap();
        client.get_taken_funds().await.unwrap();
        client.get_unused_taken_funds().await.unwrap();
        client.get_total_taken_funds().await.unwrap();
        client.close_loan(67890).await.unwrap();

        let envelopes: Vec<Value> = transport.requests().iter().map(decode_envelope).collect();
        let paths: Vec<&str> = envelopes
            .iter()
            .map(|e| e["request"].as_str().unwrap())
            .collect();
        assert_eq!(
            paths,
            vec![
                "/v1/offer/cancel",
                "/v1/offer/status",
                "/v1/credits",
                "/v1/offers",
                "/v1/offers/hist",
                "/v1/taken_funds",
                "/v1/unused_taken_funds",
                "/v1/total_taken_funds",
                "/v1/funding/close",
            ]
        );
        assert_eq!(envelopes[0]["offer_id"], 12345);
        assert_eq!(envelopes[4]["limit"], 50);
        assert_eq!(envelopes[8]["swap_id"], 67890);
    }
}
