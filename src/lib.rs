//! Core library for the `speedprobe` CLI.
//!
//! The measurement engine fans out timed HTTP transfers against every probe
//! server a provider lists and averages the per-server bit rates. Providers
//! (speedtest.net and fast.com), the `reqwest` request executor, CLI argument
//! types and configuration loading live alongside it. The primary
//! user-facing interface is the `speedprobe` command-line application.
pub mod app;
pub mod args;
pub mod config;
pub mod engine;
pub mod error;
pub mod http;
pub mod measurement;
pub mod provider;
pub mod shutdown;
pub mod shutdown_handlers;
