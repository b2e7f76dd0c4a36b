pub mod metrics;
pub mod openapi;
pub mod timeseries;
