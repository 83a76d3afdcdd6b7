pub mod config;
pub mod parameters;
pub mod resolve;
