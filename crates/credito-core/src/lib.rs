pub mod error;
pub mod parse;
pub mod rates;
pub mod time_value;
pub mod types;

#[cfg(feature = "calculator")]
pub mod amortization;

#[cfg(feature = "calculator")]
pub mod form;

pub use error::CreditoError;
pub use types::*;

/// Standard result type for all credito operations
pub type CreditoResult<T> = Result<T, CreditoError>;
