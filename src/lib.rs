//! Core library for the `kcload` CLI.
//!
//! This crate provides the internal building blocks used by the binary: CLI
//! argument types, configuration parsing, password-grant session drivers,
//! CRUD probe sequences, and metrics aggregation. The primary user-facing
//! interface is the `kcload` command-line application; library APIs may
//! evolve as the CLI grows.
pub mod args;
pub mod auth;
pub mod config;
pub mod error;
pub mod http;
pub mod metrics;
pub mod probe;
