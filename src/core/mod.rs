pub mod config;
pub mod earnings;
pub mod log;
pub mod period;
pub mod store;
pub mod tracker;
