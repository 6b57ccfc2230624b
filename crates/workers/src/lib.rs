pub mod activity;
pub mod api;
pub mod broker;
pub mod cli;
pub mod config;
pub mod engine;
pub mod logging;
pub mod metrics;
pub mod shutdown;
pub mod slack;
