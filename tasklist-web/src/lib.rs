//! # Tasklist Web Server Library
//!
//! Server-rendered task tracker: accounts, sessions and per-user task lists.
//!
//! ## Modules
//!
//! - `app`: Application state, session auth gate and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `forms`: Form schemas and validation
//! - `logging`: Tracing subscriber setup
//! - `middleware`: Security headers
//! - `routes`: Route handlers
//! - `views`: HTML rendering

pub mod app;
pub mod config;
pub mod error;
pub mod forms;
pub mod logging;
pub mod middleware;
pub mod routes;
pub mod views;
