pub mod error;
pub mod lending;
pub mod payment;
pub mod types;

#[cfg(feature = "portfolio")]
pub mod portfolio;

#[cfg(feature = "advisor")]
pub mod advisor;

pub use error::LoanRoiError;
pub use types::*;

/// Standard result type for all loan-roi operations
pub type LoanRoiResult<T> = Result<T, LoanRoiError>;

/// Maximum share of monthly income that may go to housing debt service.
pub const DEBT_RATIO_MAX: rust_decimal::Decimal = rust_decimal_macros::dec!(0.37);
