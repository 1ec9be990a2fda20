//! On-disk persistence for the application.

pub mod config;
