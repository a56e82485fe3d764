//! Consumers of a finished simulation: rule-based recommendations and the
//! summary text handed to an external text-generation service.

pub mod prompt;
pub mod recommendations;
