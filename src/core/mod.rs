//! Core investment model: strategies, the bank and scenario handling

pub mod bank;
pub mod config;
pub mod error;
pub mod log;
pub mod simulation;
pub mod strategy;

// Re-export main types for cleaner imports
pub use bank::Bank;
pub use error::InvestmentError;
pub use strategy::{BaseStrategy, BondStrategy, StockStrategy, Strategy, StrategyHandle};
