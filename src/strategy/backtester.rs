//! Streaming Mean Reversion Backtester
//!
//! One forward pass over a price sequence. At every index the running
//! Z-score decides a position, and the position decided one step earlier
//! earns the price move into this step:
//!
//! ```text
//! profit_t  = pos_{t-1} * (P_t - P_{t-1}) - cost * |pos_{t-1} - pos_t|
//! capital_t = capital_{t-1} * (1 + profit_t / P_{t-1})
//! ```
//!
//! Profit is in raw price units and is only normalised by the previous price
//! when compounding. For very large moves this is not a true return; the
//! recurrence is kept as is so results stay comparable with the reference run.
//!
//! A zero reference price divides zero by zero (or a profit by zero), so in
//! permissive mode every later capital entry becomes NaN or infinite. Strict
//! validation rejects it at the step that would use it.
//!
//! No I/O happens here. Reporting and exports consume [`BacktestOutcome`].

use serde::{Deserialize, Serialize};

use crate::domain::{BacktestError, Position, PriceSeries};
use crate::strategy::params::{BacktestParams, ValidationMode};
use crate::strategy::running_stats::RunningStats;
use crate::strategy::zscore_gate::{ZScoreGate, ZScoreResult};

/// Everything computed for one input index
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    pub index: usize,
    pub price: f64,
    pub mean: f64,
    pub std_dev: f64,
    pub z_score: f64,
    /// Position decided at this index, held over the next price move
    pub position: Position,
    pub profit: f64,
    /// Compounded capital after this step
    pub capital: f64,
}

/// Mutable state of a single run, threaded through the fold
#[derive(Debug, Clone, PartialEq)]
pub struct BacktestState {
    stats: RunningStats,
    position_prev: Position,
    capital: f64,
    cumulative_profit: f64,
    prev_price: Option<f64>,
    index: usize,
}

impl BacktestState {
    /// Fresh state: flat, nothing seen, capital at `capital_seed`
    pub fn new(capital_seed: f64) -> Self {
        Self {
            stats: RunningStats::new(),
            position_prev: Position::Flat,
            capital: capital_seed,
            cumulative_profit: 0.0,
            prev_price: None,
            index: 0,
        }
    }

    /// Advance the state by one price
    pub fn step(&mut self, gate: &ZScoreGate, trading_cost: f64, price: f64) -> StepResult {
        let snapshot = self.stats.update(price);
        let z = ZScoreResult {
            z_score: snapshot.z_score,
            mean: snapshot.mean,
            std_dev: snapshot.std_dev,
            current_price: price,
        };
        let position = gate.decide(&z);

        let (profit, reference_price) = match self.prev_price {
            None => (0.0, price),
            Some(prev) => {
                let directional = self.position_prev.exposure() * (price - prev);
                let cost = trading_cost * self.position_prev.change_magnitude(position);
                (directional - cost, prev)
            }
        };

        self.capital *= 1.0 + profit / reference_price;
        self.cumulative_profit += profit;

        let result = StepResult {
            index: self.index,
            price,
            mean: snapshot.mean,
            std_dev: snapshot.std_dev,
            z_score: snapshot.z_score,
            position,
            profit,
            capital: self.capital,
        };

        self.position_prev = position;
        self.prev_price = Some(price);
        self.index += 1;

        result
    }

    pub fn position(&self) -> Position {
        self.position_prev
    }

    pub fn capital(&self) -> f64 {
        self.capital
    }

    pub fn cumulative_profit(&self) -> f64 {
        self.cumulative_profit
    }

    /// Number of prices processed so far
    pub fn steps_taken(&self) -> usize {
        self.index
    }

    pub fn stats(&self) -> &RunningStats {
        &self.stats
    }

    /// Price the next step's profit is normalised by (`price` itself on the first step)
    pub fn reference_price(&self, price: f64) -> f64 {
        self.prev_price.unwrap_or(price)
    }
}

/// Final result of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestOutcome {
    pub steps: Vec<StepResult>,
    /// Per-step profit, one per input price
    pub profits: Vec<f64>,
    pub total_profit: f64,
    /// `initial_capital` followed by the capital after each step (n + 1)
    pub capital_curve: Vec<f64>,
}

impl BacktestOutcome {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn final_capital(&self) -> f64 {
        self.capital_curve.last().copied().unwrap_or_default()
    }

    pub fn positions(&self) -> Vec<Position> {
        self.steps.iter().map(|s| s.position).collect()
    }

    pub fn z_scores(&self) -> Vec<f64> {
        self.steps.iter().map(|s| s.z_score).collect()
    }
}

/// Single-pass mean reversion backtester.
///
/// Feed prices one at a time with [`push`](Self::push) and collect with
/// [`finish`](Self::finish), or fold a whole slice with [`run`](Self::run).
#[derive(Debug, Clone)]
pub struct StreamingMeanReversionBacktester {
    params: BacktestParams,
    gate: ZScoreGate,
    state: BacktestState,
    steps: Vec<StepResult>,
}

impl StreamingMeanReversionBacktester {
    pub fn new(params: BacktestParams) -> Self {
        let gate = ZScoreGate::from_params(&params);
        let state = BacktestState::new(params.capital_seed());
        Self {
            params,
            gate,
            state,
            steps: Vec::new(),
        }
    }

    pub fn params(&self) -> &BacktestParams {
        &self.params
    }

    pub fn state(&self) -> &BacktestState {
        &self.state
    }

    /// Process the next price.
    ///
    /// Only fails in strict validation mode, on a non-finite price or a zero
    /// reference price; the state is left untouched in that case.
    pub fn push(&mut self, price: f64) -> Result<StepResult, BacktestError> {
        if self.params.validation == ValidationMode::Strict {
            let index = self.state.steps_taken();
            if !price.is_finite() {
                return Err(BacktestError::InvalidInput(format!(
                    "non-finite price {} at index {}",
                    price, index
                )));
            }
            if self.state.reference_price(price) == 0.0 {
                return Err(BacktestError::InvalidInput(format!(
                    "zero reference price for the step at index {}",
                    index
                )));
            }
        }
        let result = self.state.step(&self.gate, self.params.trading_cost, price);
        self.steps.push(result);
        Ok(result)
    }

    /// Close the run and assemble the outcome
    pub fn finish(self) -> Result<BacktestOutcome, BacktestError> {
        if self.steps.is_empty() {
            return Err(BacktestError::InvalidInput(
                "price series is empty".to_string(),
            ));
        }

        let profits: Vec<f64> = self.steps.iter().map(|s| s.profit).collect();
        let total_profit = profits.iter().sum();

        let mut capital_curve = Vec::with_capacity(self.steps.len() + 1);
        capital_curve.push(self.params.initial_capital);
        capital_curve.extend(self.steps.iter().map(|s| s.capital));

        Ok(BacktestOutcome {
            steps: self.steps,
            profits,
            total_profit,
            capital_curve,
        })
    }

    /// Push every price of `prices` and finish the run.
    ///
    /// Continues from any prices already pushed; on a new backtester this is
    /// the whole run. Fails when no price was seen at all.
    pub fn run(mut self, prices: &[f64]) -> Result<BacktestOutcome, BacktestError> {
        self.steps.reserve(prices.len());
        for &price in prices {
            self.push(price)?;
        }
        self.finish()
    }
}

/// Validate `params` and run one backtest over `series`.
///
/// Beyond the core recurrence, parameters must be finite with
/// `initial_capital > 0` and non-negative thresholds and cost; anything else
/// is `InvalidInput`.
pub fn run_backtest(
    series: &PriceSeries,
    params: &BacktestParams,
) -> Result<BacktestOutcome, BacktestError> {
    params
        .validate()
        .map_err(|e| BacktestError::InvalidInput(e.to_string()))?;
    StreamingMeanReversionBacktester::new(params.clone()).run(series.as_slice())
}
