pub mod auth;
pub mod client;
pub mod endpoints;
pub mod schema;
pub mod transport;
pub mod validation;
pub mod withdraw;

#[cfg(test)]
mod testing;

pub use interface::{ApiResponse, BfxError, NewOrder, OfferDirection, OrderSide};

// Convenience re-exports
pub use auth::Credentials;
pub use client::BitfinexClient;
pub use endpoints::{
    BalanceHistoryParams, BookLimits, FundingTradesParams, LendsParams, MovementsParams,
    NewOrderOptions, OrderBookParams, PastTradesParams, ReplaceOrderOptions, TradesParams,
};
pub use schema::{ResponseValidator, ShapeValidator};
pub use transport::{HttpTransport, Transport};
pub use validation::AllowLists;
pub use withdraw::WithdrawConfig;
