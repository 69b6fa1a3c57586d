use interface::{ApiResponse, BfxError};
use serde_json::Map;

use crate::client::Fields;
use crate::BitfinexClient;

impl BitfinexClient {
    pub async fn get_active_positions(&self) -> Result<ApiResponse, BfxError> {
        self.post("/positions", Map::new()).await
    }

    pub async fn claim_position(
        &self,
        position_id: u64,
        amount: f64,
    ) -> Result<ApiResponse, BfxError> {
        let fields = Fields::new()
            .with("position_id", position_id)
            .decimal("amount", amount);
        self.post("/position/claim", fields.into_map()).await
    }

    pub async fn close_position(&self, position_id: u64) -> Result<ApiResponse, BfxError> {
        let fields = Fields::new().with("position_id", position_id);
        self.post("/position/close", fields.into_map()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{decode_envelope, RecordingTransport};

    #[tokio::test]
    async fn test_position_fields() {
        let transport = RecordingTransport::ok("[]");
        let client = BitfinexClient::new().with_transport(transport.clone());

        client.get_active_positions().await.unwrap();
        client.claim_position(943715, 0.25).await.unwrap();
        client.close_position(943715).await.unwrap();

        let requests = transport.requests();
        assert_eq!(decode_envelope(&requests[0])["request"], "/v1/positions");

        let claim = decode_envelope(&requests[1]);
        assert_eq!(claim["request"], "/v1/position/claim");
        assert_eq!(claim["position_id"], 943715);
        assert_eq!(claim["amount"], "0.25");

        let close = decode_envelope(&requests[2]);
        assert_eq!(close["request"], "/v1/position/close");
        assert_eq!(close["position_id"], 943715);
        assert_eq!(requests[2].url, "https://api.bitfinex.com/v1/position/close/");
    }
}
