use super::BaseStrategy;
use crate::core::error::{InvestmentError, Result, ensure_non_negative, ensure_positive_amount};

pub const BOND_STRATEGY_NAME: &str = "Bond";

/// Flat risk surcharge for bonds the issuer may redeem early.
const CALLABLE_RISK_PREMIUM: f64 = 0.1;

#[derive(Debug, Clone, PartialEq)]
pub struct BondStrategy {
    base: BaseStrategy,
    interest_rate: f64,
    term_years: u32,
    inflation_rate: f64,
    callable: bool,
    callable_adjustment: f64,
    base_risk_weight: f64,
    inflation_adjustment: f64,
}

/// Constructor arguments for [`BondStrategy`]; `Default` matches the bond defaults.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BondTerms {
    pub interest_rate: f64,
    pub term_years: u32,
    pub inflation_rate: f64,
    pub callable: bool,
    pub callable_adjustment: f64,
    pub base_risk_weight: f64,
    pub inflation_adjustment: f64,
    pub risk_rating: f64,
}

impl Default for BondTerms {
    fn default() -> Self {
        Self {
            interest_rate: 0.05,
            term_years: 5,
            inflation_rate: 0.02,
            callable: false,
            callable_adjustment: 0.9,
            base_risk_weight: 0.8,
            inflation_adjustment: 1.0,
            risk_rating: 0.2,
        }
    }
}

fn ensure_term(term_years: u32) -> Result<()> {
    if term_years > 0 {
        Ok(())
    } else {
        Err(InvestmentError::invalid_parameter(
            "term_years",
            "must be positive",
        ))
    }
}

fn ensure_callable_adjustment(adjustment: f64) -> Result<()> {
    if adjustment > 0.0 && adjustment <= 1.0 {
        Ok(())
    } else {
        Err(InvestmentError::invalid_parameter(
            "callable_adjustment",
            format!("must be in (0, 1], got {adjustment}"),
        ))
    }
}

fn ensure_inflation_adjustment(adjustment: f64) -> Result<()> {
    if adjustment.is_finite() && adjustment > 0.0 {
        Ok(())
    } else {
        Err(InvestmentError::invalid_parameter(
            "inflation_adjustment",
            format!("must be positive, got {adjustment}"),
        ))
    }
}

impl BondStrategy {
    pub fn new(terms: BondTerms) -> Result<Self> {
        ensure_non_negative("interest_rate", terms.interest_rate)?;
        ensure_term(terms.term_years)?;
        ensure_non_negative("inflation_rate", terms.inflation_rate)?;
        ensure_callable_adjustment(terms.callable_adjustment)?;
        ensure_non_negative("base_risk_weight", terms.base_risk_weight)?;
        ensure_inflation_adjustment(terms.inflation_adjustment)?;

        Ok(Self {
            base: BaseStrategy::new(BOND_STRATEGY_NAME, terms.risk_rating)?,
            interest_rate: terms.interest_rate,
            term_years: terms.term_years,
            inflation_rate: terms.inflation_rate,
            callable: terms.callable,
            callable_adjustment: terms.callable_adjustment,
            base_risk_weight: terms.base_risk_weight,
            inflation_adjustment: terms.inflation_adjustment,
        })
    }

    /// Bond with the given rate and term, other terms defaulted.
    pub fn with_rate(interest_rate: f64, term_years: u32) -> Result<Self> {
        Self::new(BondTerms {
            interest_rate,
            term_years,
            ..BondTerms::default()
        })
    }

    pub fn base(&self) -> &BaseStrategy {
        &self.base
    }

    pub fn base_mut(&mut self) -> &mut BaseStrategy {
        &mut self.base
    }

    /// Nominal rate after the callable haircut, less inflation when the
    /// haircut rate still beats it.
    pub fn effective_rate(&self) -> f64 {
        let mut rate = self.interest_rate;
        if self.callable {
            rate *= self.callable_adjustment;
        }
        if rate > self.inflation_rate {
            rate -= self.inflation_rate * self.inflation_adjustment;
        }
        rate
    }

    /// Compound growth over the full term.
    pub fn invest(&self, amount: f64) -> Result<f64> {
        ensure_positive_amount(amount)?;
        Ok(amount * (1.0 + self.effective_rate()).powf(f64::from(self.term_years)))
    }

    /// Simple-interest approximation of the gain over the term.
    pub fn potential_return(&self, amount: f64) -> Result<f64> {
        ensure_positive_amount(amount)?;
        Ok(amount * self.effective_rate() * f64::from(self.term_years))
    }

    pub fn risk(&self) -> f64 {
        let callable_premium = if self.callable {
            CALLABLE_RISK_PREMIUM
        } else {
            0.0
        };
        self.base_risk_weight * self.base.risk_rating()
            + callable_premium
            + self.inflation_rate * self.inflation_adjustment
    }

    pub fn interest_rate(&self) -> f64 {
        self.interest_rate
    }

    pub fn set_interest_rate(&mut self, rate: f64) -> Result<()> {
        ensure_non_negative("interest_rate", rate)?;
        self.interest_rate = rate;
        Ok(())
    }

    pub fn term_years(&self) -> u32 {
        self.term_years
    }

    pub fn set_term_years(&mut self, years: u32) -> Result<()> {
        ensure_term(years)?;
        self.term_years = years;
        Ok(())
    }

    pub fn inflation_rate(&self) -> f64 {
        self.inflation_rate
    }

    pub fn set_inflation_rate(&mut self, inflation: f64) -> Result<()> {
        ensure_non_negative("inflation_rate", inflation)?;
        self.inflation_rate = inflation;
        Ok(())
    }

    pub fn is_callable(&self) -> bool {
        self.callable
    }

    pub fn set_callable(&mut self, callable: bool) {
        self.callable = callable;
    }

    pub fn callable_adjustment(&self) -> f64 {
        self.callable_adjustment
    }

    pub fn set_callable_adjustment(&mut self, adjustment: f64) -> Result<()> {
        ensure_callable_adjustment(adjustment)?;
        self.callable_adjustment = adjustment;
        Ok(())
    }

    pub fn base_risk_weight(&self) -> f64 {
        self.base_risk_weight
    }

    pub fn set_base_risk_weight(&mut self, weight: f64) -> Result<()> {
        ensure_non_negative("base_risk_weight", weight)?;
        self.base_risk_weight = weight;
        Ok(())
    }

    pub fn inflation_adjustment(&self) -> f64 {
        self.inflation_adjustment
    }

    pub fn set_inflation_adjustment(&mut self, adjustment: f64) -> Result<()> {
        ensure_inflation_adjustment(adjustment)?;
        self.inflation_adjustment = adjustment;
        Ok(())
    }

    pub fn investment_details(&self, amount: f64) -> String {
        format!(
            "{} with {:.2}% interest over {} years, {:.2}% inflation, callable: {} \
             (callable adjustment: {}, base risk weight: {}, inflation adjustment: {})",
            self.base.investment_details(amount),
            self.interest_rate * 100.0,
            self.term_years,
            self.inflation_rate * 100.0,
            if self.callable { "yes" } else { "no" },
            self.callable_adjustment,
            self.base_risk_weight,
            self.inflation_adjustment,
        )
    }
}

impl Default for BondStrategy {
    fn default() -> Self {
        let terms = BondTerms::default();
        Self {
            base: BaseStrategy {
                name: BOND_STRATEGY_NAME.to_string(),
                risk_rating: terms.risk_rating,
            },
            interest_rate: terms.interest_rate,
            term_years: terms.term_years,
            inflation_rate: terms.inflation_rate,
            callable: terms.callable,
            callable_adjustment: terms.callable_adjustment,
            base_risk_weight: terms.base_risk_weight,
            inflation_adjustment: terms.inflation_adjustment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn plain_bond(rate: f64, years: u32) -> BondStrategy {
        BondStrategy::new(BondTerms {
            interest_rate: rate,
            term_years: years,
            inflation_rate: 0.0,
            ..BondTerms::default()
        })
        .unwrap()
    }

    #[test]
    fn test_compound_growth_without_inflation() {
        let bond = plain_bond(0.04, 3);
        assert_relative_eq!(bond.effective_rate(), 0.04, epsilon = 1e-12);
        assert_relative_eq!(bond.invest(2000.0).unwrap(), 2249.728, epsilon = 1e-9);
    }

    #[test]
    fn test_effective_rate_subtracts_inflation() {
        let bond = BondStrategy::default();
        assert_relative_eq!(bond.effective_rate(), 0.03, epsilon = 1e-12);

        let callable = BondStrategy::new(BondTerms {
            callable: true,
            ..BondTerms::default()
        })
        .unwrap();
        // 0.05 * 0.9 - 0.02
        assert_relative_eq!(callable.effective_rate(), 0.025, epsilon = 1e-12);
    }

    #[test]
    fn test_effective_rate_keeps_rate_below_inflation() {
        let bond = BondStrategy::new(BondTerms {
            interest_rate: 0.01,
            inflation_rate: 0.03,
            ..BondTerms::default()
        })
        .unwrap();
        assert_relative_eq!(bond.effective_rate(), 0.01, epsilon = 1e-12);
    }

    #[test]
    fn test_potential_return_is_simple_interest() {
        let bond = BondStrategy::default();
        assert_relative_eq!(
            bond.potential_return(1000.0).unwrap(),
            1000.0 * 0.03 * 5.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_risk_formula() {
        let bond = BondStrategy::default();
        // 0.8 * 0.2 + 0 + 0.02 * 1.0
        assert_relative_eq!(bond.risk(), 0.18, epsilon = 1e-12);

        let mut callable = BondStrategy::default();
        callable.set_callable(true);
        assert_relative_eq!(callable.risk(), 0.28, epsilon = 1e-12);
    }

    #[test]
    fn test_invest_grows_principal() {
        let bond = BondStrategy::new(BondTerms {
            callable: true,
            ..BondTerms::default()
        })
        .unwrap();
        let amount = 1000.0;
        assert!(bond.invest(amount).unwrap() > amount);
        assert!(bond.potential_return(amount).unwrap() > 0.0);
        assert!(bond.risk() > 0.0);
    }

    #[test]
    fn test_rejects_non_positive_amount() {
        let bond = BondStrategy::default();
        assert_eq!(bond.invest(0.0), Err(InvestmentError::InvalidAmount(0.0)));
        assert!(bond.potential_return(-1.0).is_err());
    }

    #[test]
    fn test_constructor_validation() {
        let cases = [
            BondTerms {
                interest_rate: -0.01,
                ..BondTerms::default()
            },
            BondTerms {
                term_years: 0,
                ..BondTerms::default()
            },
            BondTerms {
                inflation_rate: -0.02,
                ..BondTerms::default()
            },
            BondTerms {
                callable_adjustment: 0.0,
                ..BondTerms::default()
            },
            BondTerms {
                callable_adjustment: 1.2,
                ..BondTerms::default()
            },
            BondTerms {
                base_risk_weight: -0.8,
                ..BondTerms::default()
            },
            BondTerms {
                inflation_adjustment: 0.0,
                ..BondTerms::default()
            },
        ];
        for terms in cases {
            assert!(
                matches!(
                    BondStrategy::new(terms),
                    Err(InvestmentError::InvalidParameter { .. })
                ),
                "expected rejection for {terms:?}"
            );
        }
    }

    #[test]
    fn test_set_interest_rate_negative_leaves_state() {
        let mut bond = plain_bond(0.04, 3);
        let before = bond.clone();
        assert!(matches!(
            bond.set_interest_rate(-0.01),
            Err(InvestmentError::InvalidParameter {
                name: "interest_rate",
                ..
            })
        ));
        assert_eq!(bond, before);
    }

    #[test]
    fn test_setters_round_trip() {
        let mut bond = BondStrategy::default();
        let old_rate = bond.interest_rate();
        bond.set_interest_rate(old_rate + 0.01).unwrap();
        assert_eq!(bond.interest_rate(), old_rate + 0.01);

        let old_term = bond.term_years();
        bond.set_term_years(old_term + 1).unwrap();
        assert_eq!(bond.term_years(), old_term + 1);

        let old_inflation = bond.inflation_rate();
        bond.set_inflation_rate(old_inflation + 0.005).unwrap();
        assert_eq!(bond.inflation_rate(), old_inflation + 0.005);

        let was_callable = bond.is_callable();
        bond.set_callable(!was_callable);
        assert_ne!(bond.is_callable(), was_callable);

        bond.set_callable_adjustment(1.0).unwrap();
        assert_eq!(bond.callable_adjustment(), 1.0);
        bond.set_base_risk_weight(0.6).unwrap();
        assert_eq!(bond.base_risk_weight(), 0.6);
        bond.set_inflation_adjustment(0.5).unwrap();
        assert_eq!(bond.inflation_adjustment(), 0.5);
    }

    #[test]
    fn test_set_term_years_rejects_zero() {
        let mut bond = BondStrategy::default();
        assert!(bond.set_term_years(0).is_err());
        assert_eq!(bond.term_years(), 5);
    }

    #[test]
    fn test_investment_details() {
        let bond = plain_bond(0.04, 3);
        let details = bond.investment_details(2000.0);
        assert!(details.starts_with("Investing $2000.00 using Bond strategy (Risk rating: 0.2)"));
        assert!(details.contains("4.00% interest over 3 years"));
        assert!(details.contains("callable: no"));
        assert!(details.contains("base risk weight: 0.8"));
    }
}
