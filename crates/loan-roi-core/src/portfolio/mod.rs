//! Multi-property projections.

pub mod rent_vesting;
