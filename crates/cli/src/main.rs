use std::{
    env, fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use bitfinex::{
    auth::has_api_credentials, BitfinexClient, BookLimits, Credentials, LendsParams,
    OrderBookParams, ShapeValidator, TradesParams,
};
use eyre::WrapErr;
use interface::{ApiResponse, BfxError};
use structopt::StructOpt;
use tracing::{info, warn};

mod logger;

#[derive(Debug, StructOpt)]
#[structopt(name = "bfx", about = "Bitfinex v1 REST API 콘솔")]
struct Opt {
    /// 첫 줄 access key, 둘째 줄 secret key가 담긴 파일 (없으면 BFX_API_KEY/BFX_API_SECRET)
    #[structopt(long, parse(from_os_str))]
    key_file: Option<PathBuf>,

    #[structopt(long, default_value = "logs", parse(from_os_str))]
    log_dir: PathBuf,

    /// 응답 형태 검증
    #[structopt(long)]
    validate: bool,

    /// /symbols 응답으로 심볼 허용 목록 갱신
    #[structopt(long)]
    discover_symbols: bool,

    #[structopt(subcommand)]
    cmd: Command,
}

#[derive(Debug, StructOpt)]
enum Command {
    /// 티커
    Ticker { symbol: String },
    /// 기간별 거래량
    Stats { symbol: String },
    /// 오더북
    Book {
        symbol: String,
        #[structopt(long, default_value = "50")]
        limit_bids: u32,
        #[structopt(long, default_value = "50")]
        limit_asks: u32,
        /// 같은 가격 주문을 합치지 않음
        #[structopt(long)]
        no_group: bool,
    },
    /// 최근 체결
    Trades {
        symbol: String,
        #[structopt(long, default_value = "0")]
        since: u64,
        #[structopt(long, default_value = "50")]
        limit: u32,
    },
    /// 최근 대출
    Lends {
        currency: String,
        #[structopt(long, default_value = "0")]
        since: u64,
        #[structopt(long, default_value = "50")]
        limit: u32,
    },
    /// 펀딩 오더북
    FundingBook {
        currency: String,
        #[structopt(long, default_value = "50")]
        limit_bids: u32,
        #[structopt(long, default_value = "50")]
        limit_asks: u32,
    },
    Symbols,
    SymbolsDetails,
    AccountInfo,
    Summary,
    Balances,
    KeyInfo,
    MarginInfos,
    ActiveOrders,
    OrdersHistory {
        #[structopt(long, default_value = "50")]
        limit: u32,
    },
    OrderStatus { order_id: u64 },
    CancelOrder { order_id: u64 },
    CancelAll,
    Positions,
    Offers,
    Credits,
    /// withdraw.conf 설정으로 출금 (--conf > BFX_WITHDRAW_CONF > config/withdraw.conf)
    Withdraw {
        #[structopt(long, parse(from_os_str))]
        conf: Option<PathBuf>,
    },
}

impl Command {
    fn is_public(&self) -> bool {
        matches!(
            self,
            Command::Ticker { .. }
                | Command::Stats { .. }
                | Command::Book { .. }
                | Command::Trades { .. }
                | Command::Lends { .. }
                | Command::FundingBook { .. }
                | Command::Symbols
                | Command::SymbolsDetails
        )
    }
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // init error reporting
    color_eyre::install()?;

    dotenv::dotenv().ok();

    let opt = Opt::from_args();

    // init logging
    let _guards = logger::init_tracing(&opt.log_dir)?;

    let mut client = build_client(&opt)?;

    if opt.discover_symbols {
        match client.load_symbols().await {
            Ok(count) => info!("심볼 {}개 로드", count),
            Err(e) => warn!("심볼 목록 갱신 실패, 기본 목록 사용: {}", e),
        }
    }

    let result = run(&client, opt.cmd).await;
    report(result)
}

fn build_client(opt: &Opt) -> eyre::Result<BitfinexClient> {
    let mut client = BitfinexClient::new();

    if let Some(path) = &opt.key_file {
        client = client.with_keys(read_key_file(path)?);
    } else if has_api_credentials() {
        client = client.with_keys(Credentials::from_env()?);
    } else if !opt.cmd.is_public() {
        warn!("API 키가 없습니다. --key-file 또는 BFX_API_KEY/BFX_API_SECRET을 설정하세요");
    }

    if opt.validate {
        client = client.with_validator(Arc::new(ShapeValidator::new()));
    }

    if let Ok(path) = env::var("BFX_WITHDRAW_CONF") {
        client.set_withdraw_conf_path(path);
    }

    Ok(client)
}

/// 첫 줄 access key, 둘째 줄 secret key
fn read_key_file(path: &Path) -> eyre::Result<Credentials> {
    let text = fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read key file {}", path.display()))?;
    let mut lines = text.lines().map(str::trim);

    let api_key = lines.next().unwrap_or_default();
    let api_secret = lines.next().unwrap_or_default();
    if api_key.is_empty() || api_secret.is_empty() {
        return Err(eyre::eyre!(
            "Key file {} must contain the access key and secret key on separate lines",
            path.display()
        ));
    }

    Ok(Credentials::new(api_key, api_secret))
}

async fn run(client: &BitfinexClient, cmd: Command) -> Result<ApiResponse, BfxError> {
    match cmd {
        Command::Ticker { symbol } => client.get_ticker(&symbol).await,
        Command::Stats { symbol } => client.get_stats(&symbol).await,
        Command::Book {
            symbol,
            limit_bids,
            limit_asks,
            no_group,
        } => {
            let params = OrderBookParams {
                limit_bids,
                limit_asks,
                group: !no_group,
            };
            client.get_order_book(&symbol, params).await
        }
        Command::Trades {
            symbol,
            since,
            limit,
        } => {
            let params = TradesParams {
                since,
                limit_trades: limit,
            };
            client.get_trades(&symbol, params).await
        }
        Command::Lends {
            currency,
            since,
            limit,
        } => {
            let params = LendsParams {
                since,
                limit_lends: limit,
            };
            client.get_lends(&currency, params).await
        }
        Command::FundingBook {
            currency,
            limit_bids,
            limit_asks,
        } => {
            let limits = BookLimits {
                limit_bids,
                limit_asks,
            };
            client.get_funding_book(&currency, limits).await
        }
        Command::Symbols => client.get_symbols().await,
        Command::SymbolsDetails => client.get_symbols_details().await,
        Command::AccountInfo => client.get_account_info().await,
        Command::Summary => client.get_summary().await,
        Command::Balances => client.get_balances().await,
        Command::KeyInfo => client.get_key_permissions().await,
        Command::MarginInfos => client.get_margin_infos().await,
        Command::ActiveOrders => client.get_active_orders().await,
        Command::OrdersHistory { limit } => client.get_orders_history(limit).await,
        Command::OrderStatus { order_id } => client.get_order_status(order_id).await,
        Command::CancelOrder { order_id } => client.cancel_order(order_id).await,
        Command::CancelAll => client.cancel_all_orders().await,
        Command::Positions => client.get_active_positions().await,
        Command::Offers => client.get_offers().await,
        Command::Credits => client.get_active_credits().await,
        Command::Withdraw { conf } => match conf {
            Some(path) => {
                let mut client = client.clone();
                client.set_withdraw_conf_path(path);
                client.withdraw().await
            }
            None => client.withdraw().await,
        },
    }
}

/// 응답 본문을 그대로 출력. 실패하면 에러 코드와 함께 출력한다.
fn report(result: Result<ApiResponse, BfxError>) -> eyre::Result<()> {
    match result.and_then(ApiResponse::error_for_status) {
        Ok(response) => {
            println!("{}", response.body);
            Ok(())
        }
        Err(e) => {
            if let Some(body) = e.body() {
                println!("{}", body);
            }
            Err(eyre::eyre!("Bitfinex error code {}: {}", e.code(), e))
        }
    }
}
