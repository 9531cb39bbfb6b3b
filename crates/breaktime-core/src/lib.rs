//! Breaktime core library
//!
//! The reminder engine plus the storage and services the desktop shell
//! is built on. Nothing in here depends on a windowing toolkit.

pub mod calories;
pub mod config;
pub mod database;
pub mod error;
pub mod reminder;
pub mod services;
