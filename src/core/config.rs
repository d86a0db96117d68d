use crate::core::strategy::{
    BaseStrategy, BondStrategy, BondTerms, Parameter, StockStrategy, Strategy,
};
use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BankConfig {
    pub name: String,
    #[serde(default)]
    pub initial_funds: f64,
}

fn default_stock_risk() -> f64 {
    StockStrategy::DEFAULT_RISK
}
fn default_expected_return() -> f64 {
    StockStrategy::DEFAULT_EXPECTED_RETURN
}
fn default_volatility() -> f64 {
    StockStrategy::DEFAULT_VOLATILITY
}
fn default_dividend_yield() -> f64 {
    StockStrategy::DEFAULT_DIVIDEND_YIELD
}
fn default_interest_rate() -> f64 {
    BondTerms::default().interest_rate
}
fn default_term_years() -> u32 {
    BondTerms::default().term_years
}
fn default_inflation_rate() -> f64 {
    BondTerms::default().inflation_rate
}
fn default_callable_adjustment() -> f64 {
    BondTerms::default().callable_adjustment
}
fn default_base_risk_weight() -> f64 {
    BondTerms::default().base_risk_weight
}
fn default_inflation_adjustment() -> f64 {
    BondTerms::default().inflation_adjustment
}
fn default_bond_risk() -> f64 {
    BondTerms::default().risk_rating
}

/// Variant-specific settings. Omitted fields take the strategy defaults.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StrategySpec {
    Base {
        name: String,
        #[serde(default)]
        risk: f64,
    },
    Stock {
        #[serde(default = "default_stock_risk")]
        risk: f64,
        #[serde(default = "default_expected_return")]
        expected_return: f64,
        #[serde(default = "default_volatility")]
        volatility_factor: f64,
        #[serde(default = "default_dividend_yield")]
        dividend_yield: f64,
    },
    Bond {
        #[serde(default = "default_bond_risk")]
        risk: f64,
        #[serde(default = "default_interest_rate")]
        interest_rate: f64,
        #[serde(default = "default_term_years")]
        term_years: u32,
        #[serde(default = "default_inflation_rate")]
        inflation_rate: f64,
        #[serde(default)]
        callable: bool,
        #[serde(default = "default_callable_adjustment")]
        callable_adjustment: f64,
        #[serde(default = "default_base_risk_weight")]
        base_risk_weight: f64,
        #[serde(default = "default_inflation_adjustment")]
        inflation_adjustment: f64,
    },
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct StrategyConfig {
    pub id: String,
    #[serde(flatten)]
    pub spec: StrategySpec,
}

impl StrategyConfig {
    pub fn build(&self) -> Result<Strategy> {
        let strategy: Strategy = match &self.spec {
            StrategySpec::Base { name, risk } => BaseStrategy::new(name.as_str(), *risk)?.into(),
            StrategySpec::Stock {
                risk,
                expected_return,
                volatility_factor,
                dividend_yield,
            } => StockStrategy::new(*risk, *expected_return, *volatility_factor, *dividend_yield)?
                .into(),
            StrategySpec::Bond {
                risk,
                interest_rate,
                term_years,
                inflation_rate,
                callable,
                callable_adjustment,
                base_risk_weight,
                inflation_adjustment,
            } => BondStrategy::new(BondTerms {
                interest_rate: *interest_rate,
                term_years: *term_years,
                inflation_rate: *inflation_rate,
                callable: *callable,
                callable_adjustment: *callable_adjustment,
                base_risk_weight: *base_risk_weight,
                inflation_adjustment: *inflation_adjustment,
                risk_rating: *risk,
            })?
            .into(),
        };
        Ok(strategy)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AdjustStep {
    pub strategy: String,
    pub parameter: Parameter,
    pub value: f64,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CallableStep {
    pub strategy: String,
    pub value: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct QuoteStep {
    pub strategy: String,
    pub amount: f64,
}

/// One scripted action against the bank or a strategy.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Deposit(f64),
    Withdraw(f64),
    /// Attach the strategy with this id to the bank.
    Use(String),
    Invest(f64),
    Rename(String),
    Adjust(AdjustStep),
    Callable(CallableStep),
    Potential(QuoteStep),
    Describe(QuoteStep),
}

impl Step {
    /// Strategy id the step refers to, if any.
    pub fn strategy_ref(&self) -> Option<&str> {
        match self {
            Step::Use(id) => Some(id.as_str()),
            Step::Adjust(step) => Some(step.strategy.as_str()),
            Step::Callable(step) => Some(step.strategy.as_str()),
            Step::Potential(step) | Step::Describe(step) => Some(step.strategy.as_str()),
            Step::Deposit(_) | Step::Withdraw(_) | Step::Invest(_) | Step::Rename(_) => None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AppConfig {
    pub bank: BankConfig,
    #[serde(default)]
    pub strategies: Vec<StrategyConfig>,
    /// Steps are written as single-key maps (`- deposit: 5000.0`), which
    /// serde_yaml only reads for enums through `singleton_map_recursive`.
    #[serde(default, with = "serde_yaml::with::singleton_map_recursive")]
    pub steps: Vec<Step>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "invsim", "invsim")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config = Self::from_yaml(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that strategy ids are unique and every step names a known one.
    pub fn validate(&self) -> Result<()> {
        let mut ids = HashSet::new();
        for strategy in &self.strategies {
            if !ids.insert(strategy.id.as_str()) {
                bail!("Duplicate strategy id '{}'", strategy.id);
            }
        }

        for (index, step) in self.steps.iter().enumerate() {
            if let Some(id) = step.strategy_ref() {
                if !ids.contains(id) {
                    bail!("Step {} refers to unknown strategy '{}'", index + 1, id);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: &str = r#"
bank:
  name: "Demo Bank"
  initial_funds: 10000.0
strategies:
  - id: growth
    kind: stock
    risk: 0.5
    expected_return: 0.10
  - id: safe
    kind: bond
    interest_rate: 0.04
    term_years: 3
  - id: cash
    kind: base
    name: "Cash"
steps:
  - deposit: 5000.0
  - use: growth
  - invest: 3000.0
  - adjust:
      strategy: growth
      parameter: risk_rating
      value: 0.7
  - potential:
      strategy: growth
      amount: 3000.0
  - callable:
      strategy: safe
      value: true
  - withdraw: 1000
"#;

    #[test]
    fn test_config_deserialization() {
        let config = AppConfig::from_yaml(SCENARIO).expect("Failed to deserialize");
        assert_eq!(config.bank.name, "Demo Bank");
        assert_eq!(config.bank.initial_funds, 10000.0);
        assert_eq!(config.strategies.len(), 3);

        assert_eq!(config.strategies[0].id, "growth");
        if let StrategySpec::Stock {
            risk,
            expected_return,
            volatility_factor,
            dividend_yield,
        } = &config.strategies[0].spec
        {
            assert_eq!(*risk, 0.5);
            assert_eq!(*expected_return, 0.10);
            assert_eq!(*volatility_factor, StockStrategy::DEFAULT_VOLATILITY);
            assert_eq!(*dividend_yield, StockStrategy::DEFAULT_DIVIDEND_YIELD);
        } else {
            panic!("Expected a stock strategy");
        }

        if let StrategySpec::Bond {
            interest_rate,
            term_years,
            inflation_rate,
            callable,
            ..
        } = &config.strategies[1].spec
        {
            assert_eq!(*interest_rate, 0.04);
            assert_eq!(*term_years, 3);
            assert_eq!(*inflation_rate, 0.02);
            assert!(!callable);
        } else {
            panic!("Expected a bond strategy");
        }

        assert_eq!(config.steps.len(), 7);
        assert_eq!(config.steps[0], Step::Deposit(5000.0));
        assert_eq!(config.steps[1], Step::Use("growth".to_string()));
        assert_eq!(
            config.steps[3],
            Step::Adjust(AdjustStep {
                strategy: "growth".to_string(),
                parameter: Parameter::RiskRating,
                value: 0.7,
            })
        );
        assert_eq!(config.steps[6], Step::Withdraw(1000.0));
    }

    #[test]
    fn test_steps_parse_as_single_key_maps() {
        let yaml = r#"
bank:
  name: "Bank"
  initial_funds: 100.0
strategies:
  - id: safe
    kind: bond
steps:
  - deposit: 50.0
  - rename: "New Bank"
  - describe:
      strategy: safe
      amount: 20.0
"#;
        let config = AppConfig::from_yaml(yaml).unwrap();
        assert_eq!(
            config.steps,
            vec![
                Step::Deposit(50.0),
                Step::Rename("New Bank".to_string()),
                Step::Describe(QuoteStep {
                    strategy: "safe".to_string(),
                    amount: 20.0,
                }),
            ]
        );

        let written = serde_yaml::to_string(&config).unwrap();
        assert!(written.contains("- deposit: 50"));
        assert_eq!(AppConfig::from_yaml(&written).unwrap(), config);
    }

    #[test]
    fn test_build_strategies() {
        let config = AppConfig::from_yaml(SCENARIO).unwrap();
        let stock = config.strategies[0].build().unwrap();
        assert_eq!(stock.name(), "Stock");
        let bond = config.strategies[1].build().unwrap();
        assert_eq!(bond.as_bond().unwrap().term_years(), 3);
        let cash = config.strategies[2].build().unwrap();
        assert_eq!(cash.name(), "Cash");
        assert_eq!(cash.risk_rating(), 0.0);
    }

    #[test]
    fn test_build_rejects_invalid_values() {
        let yaml = r#"
bank:
  name: "Bank"
strategies:
  - id: bad
    kind: bond
    term_years: 0
"#;
        let config = AppConfig::from_yaml(yaml).unwrap();
        let err = config.strategies[0].build().unwrap_err();
        assert!(err.to_string().contains("term_years"));
    }

    #[test]
    fn test_validate_unknown_strategy() {
        let yaml = r#"
bank:
  name: "Bank"
  initial_funds: 100.0
strategies:
  - id: growth
    kind: stock
steps:
  - use: missing
"#;
        let err = AppConfig::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("unknown strategy 'missing'"));
    }

    #[test]
    fn test_validate_duplicate_ids() {
        let yaml = r#"
bank:
  name: "Bank"
strategies:
  - id: same
    kind: stock
  - id: same
    kind: bond
"#;
        let err = AppConfig::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("Duplicate strategy id"));
    }

    #[test]
    fn test_load_from_path_reports_missing_file() {
        let err = AppConfig::load_from_path("/nonexistent/invsim.yaml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
