//! CLI command handlers

pub mod book;
pub mod config;
pub mod data;
pub mod search;
pub mod shelf;
pub mod status;
