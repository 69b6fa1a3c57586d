//! 엔드포인트별 `BitfinexClient` 메서드
//!
//! 공개 API는 GET, 나머지는 서명된 POST로 전송된다.
//! 열거형 파라미터는 요청 전에 허용 목록으로 검증하며, 실패하면 네트워크 호출 없이 에러를 돌려준다.

mod account;
mod funding;
mod history;
mod orders;
mod positions;
mod public;

pub use funding::FundingTradesParams;
pub use history::{BalanceHistoryParams, MovementsParams, PastTradesParams};
pub use orders::{NewOrderOptions, ReplaceOrderOptions};
pub use public::{BookLimits, LendsParams, OrderBookParams, TradesParams};
