#![deny(
    clippy::expect_used,
    clippy::panic,
    clippy::print_stdout,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used
)]

pub mod cache;
pub mod clock;
pub mod config;
pub mod congress;
pub mod db;
pub mod extract;
pub mod http;
pub mod import;
pub mod models;
pub mod providers;
pub mod rest;
pub mod services;
pub mod store;
pub mod validation;
