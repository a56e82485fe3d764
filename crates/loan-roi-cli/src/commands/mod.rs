pub mod advisor;
pub mod lending;
pub mod portfolio;
