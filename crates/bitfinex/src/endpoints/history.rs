use interface::{ApiResponse, BfxError};

use crate::auth::get_timestamp;
use crate::client::Fields;
use crate::validation::ALL;
use crate::BitfinexClient;

/// /history 조회 조건. `until`이 없으면 현재 시각(ms)을 쓴다.
#[derive(Debug, Clone)]
pub struct BalanceHistoryParams {
    pub since: u64,
    pub until: Option<u64>,
    pub limit: u32,
    /// 지갑 이름 또는 "all" (all이면 필드를 보내지 않음)
    pub wallet: String,
}

impl Default for BalanceHistoryParams {
    fn default() -> Self {
        Self {
            since: 0,
            until: None,
            limit: 500,
            wallet: ALL.to_string(),
        }
    }
}

/// /history/movements 조회 조건
#[derive(Debug, Clone)]
pub struct MovementsParams {
    /// deposit method, "wire" 또는 "all"
    pub method: String,
    pub since: u64,
    pub until: Option<u64>,
    pub limit: u32,
}

impl Default for MovementsParams {
    fn default() -> Self {
        Self {
            method: ALL.to_string(),
            since: 0,
            until: None,
            limit: 500,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PastTradesParams {
    /// 이 시각 이후의 체결만
    pub timestamp: u64,
    pub until: Option<u64>,
    pub limit_trades: u32,
    /// true면 오래된 순
    pub reverse: bool,
}

impl Default for PastTradesParams {
    fn default() -> Self {
        Self {
            timestamp: 0,
            until: None,
            limit_trades: 500,
            reverse: false,
        }
    }
}

fn until_or_now(until: Option<u64>) -> String {
    until.unwrap_or_else(get_timestamp).to_string()
}

impl BitfinexClient {
    pub async fn get_balance_history(
        &self,
        currency: &str,
        params: BalanceHistoryParams,
    ) -> Result<ApiResponse, BfxError> {
        self.allow.check_currency(currency)?;
        self.allow.check_wallet_or_all(&params.wallet)?;

        let mut fields = Fields::new()
            .with("currency", currency)
            .with("since", params.since.to_string())
            .with("until", until_or_now(params.until))
            .with("limit", params.limit);
        if params.wallet != ALL {
            fields = fields.with("wallet", params.wallet);
        }
        self.post("/history", fields.into_map()).await
    }

    pub async fn get_withdrawal_history(
        &self,
        currency: &str,
        params: MovementsParams,
    ) -> Result<ApiResponse, BfxError> {
        self.allow.check_currency(currency)?;
        self.allow.check_movement_method(&params.method)?;

        let mut fields = Fields::new().with("currency", currency);
        if params.method != ALL {
            fields = fields.with("method", params.method);
        }
        let fields = fields
            .with("since", params.since.to_string())
            .with("until", until_or_now(params.until))
            .with("limit", params.limit);
        self.post("/history/movements", fields.into_map()).await
    }

    pub async fn get_past_trades(
        &self,
        symbol: &str,
        params: PastTradesParams,
    ) -> Result<ApiResponse, BfxError> {
        self.allow.check_symbol(symbol)?;

        let fields = Fields::new()
            .with("symbol", symbol)
            .with("timestamp", params.timestamp.to_string())
            .with("until", until_or_now(params.until))
            .with("limit_trades", params.limit_trades)
            .flag("reverse", params.reverse);
        self.post("/mytrades", fields.into_map()).await
    }
}
