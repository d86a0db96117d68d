use super::BaseStrategy;
use crate::core::error::{Result, ensure_non_negative, ensure_positive_amount};

pub const STOCK_STRATEGY_NAME: &str = "Stock";

/// Share of the volatility factor credited as extra return.
const VOLATILITY_PREMIUM: f64 = 0.05;
const RISK_MULTIPLIER: f64 = 1.5;

#[derive(Debug, Clone, PartialEq)]
pub struct StockStrategy {
    base: BaseStrategy,
    expected_return: f64,
    volatility_factor: f64,
    dividend_yield: f64,
}

impl StockStrategy {
    pub const DEFAULT_RISK: f64 = 0.5;
    pub const DEFAULT_EXPECTED_RETURN: f64 = 0.12;
    pub const DEFAULT_VOLATILITY: f64 = 0.2;
    pub const DEFAULT_DIVIDEND_YIELD: f64 = 0.03;

    pub fn new(
        risk: f64,
        expected_return: f64,
        volatility_factor: f64,
        dividend_yield: f64,
    ) -> Result<Self> {
        ensure_non_negative("expected_return", expected_return)?;
        ensure_non_negative("volatility_factor", volatility_factor)?;
        ensure_non_negative("dividend_yield", dividend_yield)?;
        Ok(Self {
            base: BaseStrategy::new(STOCK_STRATEGY_NAME, risk)?,
            expected_return,
            volatility_factor,
            dividend_yield,
        })
    }

    /// Stock with the given risk and expected return, other fields defaulted.
    pub fn with_return(risk: f64, expected_return: f64) -> Result<Self> {
        Self::new(
            risk,
            expected_return,
            Self::DEFAULT_VOLATILITY,
            Self::DEFAULT_DIVIDEND_YIELD,
        )
    }

    pub fn base(&self) -> &BaseStrategy {
        &self.base
    }

    pub fn base_mut(&mut self) -> &mut BaseStrategy {
        &mut self.base
    }

    /// `principal + growth scaled by risk + dividend + volatility premium`.
    pub fn invest(&self, amount: f64) -> Result<f64> {
        ensure_positive_amount(amount)?;
        Ok(amount
            + amount * self.expected_return * (1.0 + self.risk())
            + amount * self.dividend_yield
            + amount * self.volatility_factor * VOLATILITY_PREMIUM)
    }

    pub fn potential_return(&self, amount: f64) -> Result<f64> {
        ensure_positive_amount(amount)?;
        Ok(amount
            * (self.expected_return
                + self.dividend_yield
                + self.volatility_factor * VOLATILITY_PREMIUM))
    }

    pub fn risk(&self) -> f64 {
        self.base.risk_rating() * RISK_MULTIPLIER + self.volatility_factor
    }

    pub fn expected_return(&self) -> f64 {
        self.expected_return
    }

    pub fn set_expected_return(&mut self, expected_return: f64) -> Result<()> {
        ensure_non_negative("expected_return", expected_return)?;
        self.expected_return = expected_return;
        Ok(())
    }

    pub fn volatility_factor(&self) -> f64 {
        self.volatility_factor
    }

    pub fn set_volatility_factor(&mut self, volatility_factor: f64) -> Result<()> {
        ensure_non_negative("volatility_factor", volatility_factor)?;
        self.volatility_factor = volatility_factor;
        Ok(())
    }

    pub fn dividend_yield(&self) -> f64 {
        self.dividend_yield
    }

    pub fn set_dividend_yield(&mut self, dividend_yield: f64) -> Result<()> {
        ensure_non_negative("dividend_yield", dividend_yield)?;
        self.dividend_yield = dividend_yield;
        Ok(())
    }

    pub fn investment_details(&self, amount: f64) -> String {
        self.base.investment_details(amount)
    }
}

impl Default for StockStrategy {
    fn default() -> Self {
        Self {
            base: BaseStrategy {
                name: STOCK_STRATEGY_NAME.to_string(),
                risk_rating: Self::DEFAULT_RISK,
            },
            expected_return: Self::DEFAULT_EXPECTED_RETURN,
            volatility_factor: Self::DEFAULT_VOLATILITY,
            dividend_yield: Self::DEFAULT_DIVIDEND_YIELD,
        }
    }
}
