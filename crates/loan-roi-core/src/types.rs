use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Ratios computed by the engine, as decimals (0.37 = 37%).
pub type Rate = Decimal;

/// Rates supplied by callers, as percentages (3.7 = 3.7%).
pub type Percent = Decimal;

/// Convert a caller-facing percentage into a decimal rate.
pub fn pct(value: Percent) -> Rate {
    value / dec!(100)
}

/// Time until a break-even point is reached, or the reason it never is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakEven {
    /// Reached after this many years (one decimal place).
    Years(Decimal),
    /// Monthly cashflow never turns non-negative during the simulation.
    Never,
    /// Equity never overtakes the cash invested before the loan ends.
    BeyondTerm,
}

pub const NEVER_LABEL: &str = "Never";
pub const BEYOND_TERM_LABEL: &str = "> Term";

impl BreakEven {
    /// Build from a month count, rounding the year figure to one decimal.
    pub fn from_months(months: u32) -> Self {
        BreakEven::Years((Decimal::from(months) / dec!(12)).round_dp(1))
    }

    pub fn years(&self) -> Option<Decimal> {
        match self {
            BreakEven::Years(y) => Some(*y),
            _ => None,
        }
    }
}

impl fmt::Display for BreakEven {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BreakEven::Years(y) => write!(f, "{:.1}", y),
            BreakEven::Never => f.write_str(NEVER_LABEL),
            BreakEven::BeyondTerm => f.write_str(BEYOND_TERM_LABEL),
        }
    }
}

impl Serialize for BreakEven {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            BreakEven::Years(y) => serializer.serialize_f64(y.to_f64().unwrap_or_default()),
            BreakEven::Never => serializer.serialize_str(NEVER_LABEL),
            BreakEven::BeyondTerm => serializer.serialize_str(BEYOND_TERM_LABEL),
        }
    }
}

struct BreakEvenVisitor;

impl Visitor<'_> for BreakEvenVisitor {
    type Value = BreakEven;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a number of years, \"{NEVER_LABEL}\" or \"{BEYOND_TERM_LABEL}\"")
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<BreakEven, E> {
        Decimal::from_f64_retain(v)
            .map(|d| BreakEven::Years(d.round_dp(1)))
            .ok_or_else(|| E::custom(format!("break-even years out of range: {v}")))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<BreakEven, E> {
        Ok(BreakEven::Years(Decimal::from(v)))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<BreakEven, E> {
        Ok(BreakEven::Years(Decimal::from(v)))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<BreakEven, E> {
        match v {
            NEVER_LABEL => Ok(BreakEven::Never),
            BEYOND_TERM_LABEL => Ok(BreakEven::BeyondTerm),
            other => Decimal::from_str(other)
                .map(BreakEven::Years)
                .map_err(|_| E::invalid_value(de::Unexpected::Str(other), &self)),
        }
    }
}

impl<'de> Deserialize<'de> for BreakEven {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(BreakEvenVisitor)
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
