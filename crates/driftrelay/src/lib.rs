pub mod cli;
pub mod config;
pub mod encoding;
pub mod event;
pub mod handler;
pub mod payload;
pub mod provider;
pub mod sink;
pub mod telemetry;
pub mod timestamp;
