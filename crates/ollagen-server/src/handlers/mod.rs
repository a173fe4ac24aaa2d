//! HTTP handlers

pub mod context;
pub mod export;
pub mod generate;
pub mod health;
pub mod history;
pub mod models;

pub use health::health;
