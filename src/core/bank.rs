//! A bank holding funds and investing them through one active strategy.

use crate::core::error::{InvestmentError, Result, ensure_positive_amount};
use crate::core::strategy::StrategyHandle;
use tracing::debug;

pub const NO_STRATEGY_LABEL: &str = "No strategy set";

#[derive(Debug)]
pub struct Bank {
    name: String,
    available_funds: f64,
    strategy: Option<StrategyHandle>,
}

impl Bank {
    pub fn new(name: impl Into<String>, initial_funds: f64) -> Result<Self> {
        if !(initial_funds.is_finite() && initial_funds >= 0.0) {
            return Err(InvestmentError::NegativeInitialFunds(initial_funds));
        }
        Ok(Self {
            name: name.into(),
            available_funds: initial_funds,
            strategy: None,
        })
    }

    /// Replaces the active strategy. The previous handle is only dropped
    /// from this bank; other holders keep it.
    pub fn set_strategy(&mut self, strategy: Option<StrategyHandle>) -> Result<()> {
        let strategy = strategy.ok_or(InvestmentError::NullStrategy)?;
        debug!(bank = %self.name, strategy = %strategy.name(), "Switching strategy");
        self.strategy = Some(strategy);
        Ok(())
    }

    pub fn strategy(&self) -> Option<&StrategyHandle> {
        self.strategy.as_ref()
    }

    /// Deducts `amount` and returns what the active strategy grows it to.
    ///
    /// Funds are deducted before the strategy runs and are not restored if
    /// it fails.
    pub fn execute_investment(&mut self, amount: f64) -> Result<f64> {
        let strategy = self.strategy.as_ref().ok_or(InvestmentError::NoStrategy)?;
        ensure_positive_amount(amount)?;
        if amount > self.available_funds {
            return Err(InvestmentError::InsufficientFunds {
                requested: amount,
                available: self.available_funds,
            });
        }

        self.available_funds -= amount;
        let grown = strategy.invest(amount)?;
        debug!(
            bank = %self.name,
            amount,
            grown,
            remaining = self.available_funds,
            "Executed investment"
        );
        Ok(grown)
    }

    pub fn current_strategy_name(&self) -> String {
        self.strategy
            .as_ref()
            .map_or(NO_STRATEGY_LABEL.to_string(), |s| s.name())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn available_funds(&self) -> f64 {
        self.available_funds
    }

    pub fn deposit_funds(&mut self, amount: f64) -> Result<()> {
        ensure_positive_amount(amount)?;
        self.available_funds += amount;
        Ok(())
    }

    /// Returns `Ok(false)` without touching the balance when funds are short.
    pub fn withdraw_funds(&mut self, amount: f64) -> Result<bool> {
        ensure_positive_amount(amount)?;
        if amount > self.available_funds {
            debug!(bank = %self.name, amount, "Withdrawal exceeds available funds");
            return Ok(false);
        }
        self.available_funds -= amount;
        Ok(true)
    }

    pub fn details(&self) -> String {
        format!(
            "Bank: {}\nAvailable Funds: ${:.2}\nCurrent Strategy: {}",
            self.name,
            self.available_funds,
            self.current_strategy_name()
        )
    }
}
