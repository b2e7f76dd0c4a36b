pub mod metric;
pub mod request;
pub mod series;
