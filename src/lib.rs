pub mod config;
pub mod gateway;
pub mod ledger;
pub mod shared;
pub mod workflow;
