//! Investment strategies and the shared handle banks hold them through.

pub mod bond;
pub mod stock;

pub use bond::{BondStrategy, BondTerms};
pub use stock::StockStrategy;

use crate::core::error::{InvestmentError, Result, ensure_positive_amount};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt::Display;
use std::rc::Rc;

/// Name and risk rating shared by every strategy. Used on its own it is the
/// neutral strategy: the principal comes back untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct BaseStrategy {
    name: String,
    risk_rating: f64,
}

fn ensure_risk_rating(risk: f64) -> Result<()> {
    if (0.0..=1.0).contains(&risk) {
        Ok(())
    } else {
        Err(InvestmentError::InvalidRisk(risk))
    }
}

impl BaseStrategy {
    pub fn new(name: impl Into<String>, risk_rating: f64) -> Result<Self> {
        ensure_risk_rating(risk_rating)?;
        Ok(Self {
            name: name.into(),
            risk_rating,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn risk_rating(&self) -> f64 {
        self.risk_rating
    }

    pub fn set_risk_rating(&mut self, risk: f64) -> Result<()> {
        ensure_risk_rating(risk)?;
        self.risk_rating = risk;
        Ok(())
    }

    pub fn invest(&self, amount: f64) -> Result<f64> {
        ensure_positive_amount(amount)?;
        Ok(amount)
    }

    pub fn potential_return(&self, amount: f64) -> Result<f64> {
        ensure_positive_amount(amount)?;
        Ok(0.0)
    }

    pub fn risk(&self) -> f64 {
        self.risk_rating
    }

    pub fn investment_details(&self, amount: f64) -> String {
        format!(
            "Investing ${amount:.2} using {} strategy (Risk rating: {})",
            self.name, self.risk_rating
        )
    }
}

/// Tunable strategy parameters, addressable by name from a scenario file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Parameter {
    RiskRating,
    ExpectedReturn,
    VolatilityFactor,
    DividendYield,
    InterestRate,
    TermYears,
    InflationRate,
    CallableAdjustment,
    BaseRiskWeight,
    InflationAdjustment,
}

impl Parameter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Parameter::RiskRating => "risk_rating",
            Parameter::ExpectedReturn => "expected_return",
            Parameter::VolatilityFactor => "volatility_factor",
            Parameter::DividendYield => "dividend_yield",
            Parameter::InterestRate => "interest_rate",
            Parameter::TermYears => "term_years",
            Parameter::InflationRate => "inflation_rate",
            Parameter::CallableAdjustment => "callable_adjustment",
            Parameter::BaseRiskWeight => "base_risk_weight",
            Parameter::InflationAdjustment => "inflation_adjustment",
        }
    }
}

impl Display for Parameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Term years arrive as `f64` from scenario files; only whole positive
/// values convert.
fn term_from_value(value: f64) -> Result<u32> {
    if value.fract() == 0.0 && value >= 1.0 && value <= f64::from(u32::MAX) {
        Ok(value as u32)
    } else {
        Err(InvestmentError::invalid_parameter(
            "term_years",
            format!("must be a whole positive number, got {value}"),
        ))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Strategy {
    Base(BaseStrategy),
    Stock(StockStrategy),
    Bond(BondStrategy),
}

impl Strategy {
    fn base(&self) -> &BaseStrategy {
        match self {
            Strategy::Base(base) => base,
            Strategy::Stock(stock) => stock.base(),
            Strategy::Bond(bond) => bond.base(),
        }
    }

    fn base_mut(&mut self) -> &mut BaseStrategy {
        match self {
            Strategy::Base(base) => base,
            Strategy::Stock(stock) => stock.base_mut(),
            Strategy::Bond(bond) => bond.base_mut(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Strategy::Base(_) => "base",
            Strategy::Stock(_) => "stock",
            Strategy::Bond(_) => "bond",
        }
    }

    pub fn name(&self) -> &str {
        self.base().name()
    }

    pub fn risk_rating(&self) -> f64 {
        self.base().risk_rating()
    }

    pub fn set_risk_rating(&mut self, risk: f64) -> Result<()> {
        self.base_mut().set_risk_rating(risk)
    }

    /// Grown value of `amount` under this strategy.
    pub fn invest(&self, amount: f64) -> Result<f64> {
        match self {
            Strategy::Base(base) => base.invest(amount),
            Strategy::Stock(stock) => stock.invest(amount),
            Strategy::Bond(bond) => bond.invest(amount),
        }
    }

    pub fn potential_return(&self, amount: f64) -> Result<f64> {
        match self {
            Strategy::Base(base) => base.potential_return(amount),
            Strategy::Stock(stock) => stock.potential_return(amount),
            Strategy::Bond(bond) => bond.potential_return(amount),
        }
    }

    pub fn risk(&self) -> f64 {
        match self {
            Strategy::Base(base) => base.risk(),
            Strategy::Stock(stock) => stock.risk(),
            Strategy::Bond(bond) => bond.risk(),
        }
    }

    pub fn investment_details(&self, amount: f64) -> String {
        match self {
            Strategy::Base(base) => base.investment_details(amount),
            Strategy::Stock(stock) => stock.investment_details(amount),
            Strategy::Bond(bond) => bond.investment_details(amount),
        }
    }

    pub fn as_stock(&self) -> Option<&StockStrategy> {
        match self {
            Strategy::Stock(stock) => Some(stock),
            _ => None,
        }
    }

    pub fn as_stock_mut(&mut self) -> Option<&mut StockStrategy> {
        match self {
            Strategy::Stock(stock) => Some(stock),
            _ => None,
        }
    }

    pub fn as_bond(&self) -> Option<&BondStrategy> {
        match self {
            Strategy::Bond(bond) => Some(bond),
            _ => None,
        }
    }

    pub fn as_bond_mut(&mut self) -> Option<&mut BondStrategy> {
        match self {
            Strategy::Bond(bond) => Some(bond),
            _ => None,
        }
    }

    fn unsupported(&self, parameter: &'static str) -> InvestmentError {
        InvestmentError::UnsupportedParameter {
            parameter,
            strategy: self.name().to_string(),
        }
    }

    /// Routes `value` to the validated setter for `parameter`.
    pub fn set_parameter(&mut self, parameter: Parameter, value: f64) -> Result<()> {
        if parameter == Parameter::RiskRating {
            return self.set_risk_rating(value);
        }
        let unsupported = self.unsupported(parameter.as_str());

        match (self, parameter) {
            (Strategy::Stock(stock), Parameter::ExpectedReturn) => {
                stock.set_expected_return(value)
            }
            (Strategy::Stock(stock), Parameter::VolatilityFactor) => {
                stock.set_volatility_factor(value)
            }
            (Strategy::Stock(stock), Parameter::DividendYield) => stock.set_dividend_yield(value),
            (Strategy::Bond(bond), Parameter::InterestRate) => bond.set_interest_rate(value),
            (Strategy::Bond(bond), Parameter::TermYears) => {
                bond.set_term_years(term_from_value(value)?)
            }
            (Strategy::Bond(bond), Parameter::InflationRate) => bond.set_inflation_rate(value),
            (Strategy::Bond(bond), Parameter::CallableAdjustment) => {
                bond.set_callable_adjustment(value)
            }
            (Strategy::Bond(bond), Parameter::BaseRiskWeight) => bond.set_base_risk_weight(value),
            (Strategy::Bond(bond), Parameter::InflationAdjustment) => {
                bond.set_inflation_adjustment(value)
            }
            _ => Err(unsupported),
        }
    }

    pub fn set_callable(&mut self, callable: bool) -> Result<()> {
        if let Strategy::Bond(bond) = self {
            bond.set_callable(callable);
            return Ok(());
        }
        Err(self.unsupported("callable"))
    }
}

impl From<BaseStrategy> for Strategy {
    fn from(base: BaseStrategy) -> Self {
        Strategy::Base(base)
    }
}

impl From<StockStrategy> for Strategy {
    fn from(stock: StockStrategy) -> Self {
        Strategy::Stock(stock)
    }
}

impl From<BondStrategy> for Strategy {
    fn from(bond: BondStrategy) -> Self {
        Strategy::Bond(bond)
    }
}

/// Shared, single-threaded handle to a strategy.
///
/// Every clone points at the same strategy: a setter called through one
/// handle is seen by every bank and caller holding another.
///
/// Access goes through closures so no borrow outlives a single call; a bank
/// can invest through a handle right after a setter ran on a clone of it.
#[derive(Debug, Clone)]
pub struct StrategyHandle(Rc<RefCell<Strategy>>);

impl StrategyHandle {
    pub fn new(strategy: impl Into<Strategy>) -> Self {
        Self(Rc::new(RefCell::new(strategy.into())))
    }

    /// Runs `f` against the shared strategy.
    pub fn with<R>(&self, f: impl FnOnce(&Strategy) -> R) -> R {
        f(&self.0.borrow())
    }

    /// Runs `f` with mutable access to the shared strategy.
    ///
    /// `f` must not reach the same strategy through another handle.
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut Strategy) -> R) -> R {
        f(&mut self.0.borrow_mut())
    }

    pub fn name(&self) -> String {
        self.with(|strategy| strategy.name().to_string())
    }

    pub fn invest(&self, amount: f64) -> Result<f64> {
        self.with(|strategy| strategy.invest(amount))
    }

    pub fn ptr_eq(&self, other: &StrategyHandle) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}
