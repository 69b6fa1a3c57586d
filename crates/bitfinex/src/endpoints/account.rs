use interface::{ApiResponse, BfxError};
use serde_json::Map;

use crate::client::Fields;
use crate::withdraw::WithdrawConfig;
use crate::BitfinexClient;

impl BitfinexClient {
    pub async fn get_account_info(&self) -> Result<ApiResponse, BfxError> {
        self.post("/account_infos", Map::new()).await
    }

    pub async fn get_account_fees(&self) -> Result<ApiResponse, BfxError> {
        self.post("/account_fees", Map::new()).await
    }

    pub async fn get_summary(&self) -> Result<ApiResponse, BfxError> {
        self.post("/summary", Map::new()).await
    }

    /// 입금 주소 조회/생성
    /// method: "bitcoin", "litecoin" 등 / wallet_name: "trading", "exchange", "deposit"
    pub async fn deposit(
        &self,
        method: &str,
        wallet_name: &str,
        renew: bool,
    ) -> Result<ApiResponse, BfxError> {
        self.allow.check_deposit_method(method)?;
        self.allow.check_wallet(wallet_name)?;

        let fields = Fields::new()
            .with("method", method)
            .with("wallet_name", wallet_name)
            .flag("renew", renew);
        self.post("/deposit/new", fields.into_map()).await
    }

    pub async fn get_key_permissions(&self) -> Result<ApiResponse, BfxError> {
        self.post("/key_info", Map::new()).await
    }

    pub async fn get_margin_infos(&self) -> Result<ApiResponse, BfxError> {
        self.post("/margin_infos", Map::new()).await
    }

    pub async fn get_balances(&self) -> Result<ApiResponse, BfxError> {
        self.post("/balances", Map::new()).await
    }

    /// 지갑 간 이체
    pub async fn transfer(
        &self,
        amount: f64,
        currency: &str,
        wallet_from: &str,
        wallet_to: &str,
    ) -> Result<ApiResponse, BfxError> {
        self.allow.check_currency(currency)?;
        self.allow.check_wallet(wallet_from)?;
        self.allow.check_wallet(wallet_to)?;

        let fields = Fields::new()
            .decimal("amount", amount)
            .with("currency", currency)
            .with("walletfrom", wallet_from)
            .with("walletto", wallet_to);
        self.post("/transfer", fields.into_map()).await
    }

    /// 출금. 파라미터는 withdraw.conf(`withdraw_conf_path`)에서 읽는다.
    pub async fn withdraw(&self) -> Result<ApiResponse, BfxError> {
        let config = WithdrawConfig::load(&self.withdraw_conf_path)?;
        self.withdraw_with(config).await
    }

    /// 이미 읽어 둔 출금 설정으로 출금
    pub async fn withdraw_with(&self, config: WithdrawConfig) -> Result<ApiResponse, BfxError> {
        if let Err(e) = config.validate(&self.allow) {
            tracing::warn!("Refusing withdraw: {}", e);
            return Err(e);
        }
        self.post("/withdraw", config.into_fields()).await
    }
}
