mod error;
mod order;
mod response;

pub use error::BfxError;
pub use order::{decimal_string, NewOrder, OfferDirection, OrderSide};
pub use response::ApiResponse;
