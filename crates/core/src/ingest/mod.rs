pub mod fmp;
pub mod provider;
pub mod types;
