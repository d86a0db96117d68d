//! Replays a scenario's steps against a bank and its strategies.
use crate::core::bank::Bank;
use crate::core::config::{AppConfig, Step};
use crate::core::strategy::StrategyHandle;
use anyhow::{Context, Result, anyhow};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info};

/// Result of one executed step.
#[derive(Debug, Clone, Serialize)]
pub struct StepOutcome {
    pub index: usize,
    pub action: &'static str,
    pub message: String,
    pub value: Option<f64>,
    pub balance: f64,
}

/// Everything a scenario run produced, up to the first failing step.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub bank_name: String,
    pub initial_details: String,
    pub outcomes: Vec<StepOutcome>,
    pub final_details: String,
    pub final_funds: f64,
    pub error: Option<String>,
}

impl SimulationReport {
    /// Plain-text transcript of the run, one block per step.
    pub fn transcript(&self) -> String {
        let mut output = format!("Initial Bank Details:\n{}\n\n", self.initial_details);
        for outcome in &self.outcomes {
            output.push_str(&format!(
                "{}. [{}] {}\n",
                outcome.index, outcome.action, outcome.message
            ));
        }
        if let Some(error) = &self.error {
            output.push_str(&format!("Investment error: {error}\n"));
        }
        output.push_str(&format!("\nFinal Bank Details:\n{}\n", self.final_details));
        output
    }
}

/// Risk and return figures for one strategy at a given principal.
#[derive(Debug, Clone, Serialize)]
pub struct StrategyQuote {
    pub id: String,
    pub name: String,
    pub kind: &'static str,
    pub risk_rating: f64,
    pub risk: f64,
    pub invested: f64,
    pub potential_return: f64,
    pub details: String,
}

fn step_action(step: &Step) -> &'static str {
    match step {
        Step::Deposit(_) => "deposit",
        Step::Withdraw(_) => "withdraw",
        Step::Use(_) => "use",
        Step::Invest(_) => "invest",
        Step::Rename(_) => "rename",
        Step::Adjust(_) => "adjust",
        Step::Callable(_) => "callable",
        Step::Potential(_) => "potential",
        Step::Describe(_) => "describe",
    }
}

fn build_strategies(config: &AppConfig) -> Result<HashMap<String, StrategyHandle>> {
    config
        .strategies
        .iter()
        .map(|strategy| -> Result<(String, StrategyHandle)> {
            let built = strategy
                .build()
                .with_context(|| format!("Invalid strategy '{}'", strategy.id))?;
            debug!(id = %strategy.id, kind = built.kind(), "Built strategy");
            Ok((strategy.id.clone(), StrategyHandle::new(built)))
        })
        .collect()
}

fn lookup<'a>(
    strategies: &'a HashMap<String, StrategyHandle>,
    id: &str,
) -> Result<&'a StrategyHandle> {
    strategies
        .get(id)
        .ok_or_else(|| anyhow!("Unknown strategy '{id}'"))
}

/// Applies one step, returning a message and the step's numeric result.
fn apply_step(
    bank: &mut Bank,
    strategies: &HashMap<String, StrategyHandle>,
    step: &Step,
) -> Result<(String, Option<f64>)> {
    let outcome = match step {
        Step::Deposit(amount) => {
            bank.deposit_funds(*amount)?;
            (format!("Deposited ${amount:.2}"), Some(*amount))
        }
        Step::Withdraw(amount) => {
            if bank.withdraw_funds(*amount)? {
                (
                    format!("Withdrawal of ${amount:.2} was successful."),
                    Some(*amount),
                )
            } else {
                (
                    format!("Withdrawal of ${amount:.2} failed due to insufficient funds."),
                    None,
                )
            }
        }
        Step::Use(id) => {
            let handle = lookup(strategies, id)?;
            bank.set_strategy(Some(handle.clone()))?;
            (format!("Switched to {} strategy", handle.name()), None)
        }
        Step::Invest(amount) => {
            let grown = bank.execute_investment(*amount)?;
            (
                format!(
                    "Invested ${amount:.2} using {} strategy; the investment grew to ${grown:.2}",
                    bank.current_strategy_name()
                ),
                Some(grown),
            )
        }
        Step::Rename(name) => {
            bank.set_name(name.as_str());
            (format!("Renamed bank to {name}"), None)
        }
        Step::Adjust(adjust) => {
            let handle = lookup(strategies, &adjust.strategy)?;
            handle.with_mut(|strategy| strategy.set_parameter(adjust.parameter, adjust.value))?;
            (
                format!(
                    "Updated {} {} to {}",
                    handle.name(),
                    adjust.parameter,
                    adjust.value
                ),
                Some(adjust.value),
            )
        }
        Step::Callable(callable) => {
            let handle = lookup(strategies, &callable.strategy)?;
            handle.with_mut(|strategy| strategy.set_callable(callable.value))?;
            (
                format!("Updated {} callable to {}", handle.name(), callable.value),
                None,
            )
        }
        Step::Potential(quote) => {
            let handle = lookup(strategies, &quote.strategy)?;
            let potential = handle.with(|strategy| strategy.potential_return(quote.amount))?;
            (
                format!(
                    "Potential return on ${:.2} using {} strategy: ${potential:.2}",
                    quote.amount,
                    handle.name()
                ),
                Some(potential),
            )
        }
        Step::Describe(quote) => {
            let handle = lookup(strategies, &quote.strategy)?;
            let details = handle.with(|strategy| strategy.investment_details(quote.amount));
            (details, None)
        }
    };
    Ok(outcome)
}

/// Builds the bank and strategies from `config` and executes its steps in
/// order. A failing step ends the run and is recorded in the report; only
/// an invalid setup is returned as `Err`.
pub fn run_scenario(config: &AppConfig) -> Result<SimulationReport> {
    config.validate()?;
    let strategies = build_strategies(config)?;
    let mut bank = Bank::new(config.bank.name.as_str(), config.bank.initial_funds)
        .with_context(|| format!("Invalid bank '{}'", config.bank.name))?;

    info!(
        bank = %config.bank.name,
        steps = config.steps.len(),
        "Running scenario"
    );

    let initial_details = bank.details();
    let mut outcomes = Vec::with_capacity(config.steps.len());
    let mut error = None;

    for (i, step) in config.steps.iter().enumerate() {
        let action = step_action(step);
        match apply_step(&mut bank, &strategies, step) {
            Ok((message, value)) => {
                debug!(step = i + 1, action, %message, "Step completed");
                outcomes.push(StepOutcome {
                    index: i + 1,
                    action,
                    message,
                    value,
                    balance: bank.available_funds(),
                });
            }
            Err(e) => {
                info!(step = i + 1, action, error = %e, "Scenario stopped");
                error = Some(format!("step {} ({action}): {e}", i + 1));
                break;
            }
        }
    }

    Ok(SimulationReport {
        bank_name: bank.name().to_string(),
        initial_details,
        outcomes,
        final_details: bank.details(),
        final_funds: bank.available_funds(),
        error,
    })
}

/// Quotes every configured strategy for the same principal.
pub fn compare_strategies(config: &AppConfig, amount: f64) -> Result<Vec<StrategyQuote>> {
    config
        .strategies
        .iter()
        .map(|entry| -> Result<StrategyQuote> {
            let strategy = entry
                .build()
                .with_context(|| format!("Invalid strategy '{}'", entry.id))?;
            Ok(StrategyQuote {
                id: entry.id.clone(),
                name: strategy.name().to_string(),
                kind: strategy.kind(),
                risk_rating: strategy.risk_rating(),
                risk: strategy.risk(),
                invested: strategy.invest(amount)?,
                potential_return: strategy.potential_return(amount)?,
                details: strategy.investment_details(amount),
            })
        })
        .collect()
}
