use std::collections::HashSet;

use interface::BfxError;

/// 기본 거래쌍 목록. `BitfinexClient::load_symbols`로 /symbols 응답으로 교체할 수 있다.
const DEFAULT_SYMBOLS: &[&str] = &[
    "btcusd", "ltcusd", "ltcbtc", "ethusd", "ethbtc", "etcbtc", "etcusd", "rrtusd", "rrtbtc",
    "zecusd", "zecbtc", "xmrusd", "xmrbtc", "dshusd", "dshbtc", "btceur", "btcjpy", "btcgbp",
    "xrpusd", "xrpbtc", "iotusd", "iotbtc", "ioteth", "eosusd", "eosbtc", "eoseth", "sanusd",
    "sanbtc", "saneth", "omgusd", "omgbtc", "omgeth", "neousd", "neobtc", "neoeth", "etpusd",
    "etpbtc", "etpeth", "btgusd", "btgbtc",
];

const DEFAULT_CURRENCIES: &[&str] = &[
    "BTG", "DSH", "ETC", "ETP", "EUR", "GBP", "IOT", "JPY", "LTC", "NEO", "OMG", "SAN", "USD",
    "XMR", "XRP", "ZEC",
];

/// 입금/출금 method (/deposit/new 문서 기준)
const DEFAULT_DEPOSIT_METHODS: &[&str] = &[
    "bcash",
    "bitcoin",
    "ethereum",
    "ethereumc",
    "litecoin",
    "mastercoin",
    "monero",
    "tetheruso",
    "zcash",
];

const DEFAULT_WALLET_NAMES: &[&str] = &["trading", "exchange", "deposit"];

/// /order/new "type" 파라미터
const DEFAULT_ORDER_TYPES: &[&str] = &[
    "market",
    "limit",
    "stop",
    "trailing-stop",
    "fill-or-kill",
    "exchange market",
    "exchange limit",
    "exchange stop",
    "exchange trailing-stop",
    "exchange fill-or-kill",
];

/// 잔고/입출금 내역 조회에서 "전체"를 뜻하는 값
pub const ALL: &str = "all";
pub const WIRE: &str = "wire";

fn to_set(values: &[&str]) -> HashSet<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// 열거형 파라미터 허용 목록. 클라이언트 생성 시 한 번 채워지고 이후 읽기 전용이다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowLists {
    symbols: HashSet<String>,
    currencies: HashSet<String>,
    deposit_methods: HashSet<String>,
    wallet_names: HashSet<String>,
    order_types: HashSet<String>,
}

impl Default for AllowLists {
    fn default() -> Self {
        Self {
            symbols: to_set(DEFAULT_SYMBOLS),
            currencies: to_set(DEFAULT_CURRENCIES),
            deposit_methods: to_set(DEFAULT_DEPOSIT_METHODS),
            wallet_names: to_set(DEFAULT_WALLET_NAMES),
            order_types: to_set(DEFAULT_ORDER_TYPES),
        }
    }
}

impl AllowLists {
    /// 심볼 목록만 교체한 사본
    pub fn with_symbols<I, S>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.symbols = symbols.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_currencies<I, S>(mut self, currencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.currencies = currencies.into_iter().map(Into::into).collect();
        self
    }

    pub fn symbols(&self) -> &HashSet<String> {
        &self.symbols
    }

    pub fn currencies(&self) -> &HashSet<String> {
        &self.currencies
    }

    pub fn deposit_methods(&self) -> &HashSet<String> {
        &self.deposit_methods
    }

    pub fn is_deposit_method(&self, method: &str) -> bool {
        self.deposit_methods.contains(method)
    }

    pub fn check_symbol(&self, symbol: &str) -> Result<(), BfxError> {
        if self.symbols.contains(symbol) {
            Ok(())
        } else {
            Err(BfxError::BadSymbol(symbol.to_string()))
        }
    }

    pub fn check_currency(&self, currency: &str) -> Result<(), BfxError> {
        if self.currencies.contains(currency) {
            Ok(())
        } else {
            Err(BfxError::BadCurrency(currency.to_string()))
        }
    }

    pub fn check_deposit_method(&self, method: &str) -> Result<(), BfxError> {
        if self.deposit_methods.contains(method) {
            Ok(())
        } else {
            Err(BfxError::BadDepositMethod(method.to_string()))
        }
    }

    /// 출금 내역 조회용: deposit method 외에 "wire"와 "all"도 허용
    pub fn check_movement_method(&self, method: &str) -> Result<(), BfxError> {
        if method == WIRE || method == ALL {
            return Ok(());
        }
        self.check_deposit_method(method)
    }

    pub fn check_wallet(&self, wallet: &str) -> Result<(), BfxError> {
        if self.wallet_names.contains(wallet) {
            Ok(())
        } else {
            Err(BfxError::BadWalletType(wallet.to_string()))
        }
    }

    /// 잔고 내역 조회용: 지갑 이름 외에 "all"도 허용
    pub fn check_wallet_or_all(&self, wallet: &str) -> Result<(), BfxError> {
        if wallet == ALL {
            return Ok(());
        }
        self.check_wallet(wallet)
    }

    pub fn check_order_type(&self, order_type: &str) -> Result<(), BfxError> {
        if self.order_types.contains(order_type) {
            Ok(())
        } else {
            Err(BfxError::BadOrderType(order_type.to_string()))
        }
    }
}

/// /symbols 응답(문자열 평면 배열)을 심볼 집합으로 변환
pub fn parse_symbol_list(body: &str) -> Result<HashSet<String>, BfxError> {
    let symbols: Vec<String> = serde_json::from_str(body).map_err(|e| {
        BfxError::SymbolList(format!(
            "{}, response: {}",
            e,
            body.chars().take(200).collect::<String>()
        ))
    })?;

    if symbols.is_empty() {
        return Err(BfxError::SymbolList("empty symbol list".to_string()));
    }

    Ok(symbols.into_iter().collect())
}
