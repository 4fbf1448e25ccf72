//! Dashboard data pipeline
//!
//! accounts → (balance ‖ positions) → market metrics → figures.
//! Each step maps its failure to a dedicated error variant and aborts the
//! rest of the pipeline. Decoding failures keep their `MalformedApiResponse`
//! tag so a bad payload is never reported as an unreachable endpoint.

use std::collections::HashMap;

use log::{debug, info};

use crate::client::BrokerageApi;
use crate::error::{DashboardError, Result};
use crate::session::SessionToken;
use crate::types::{Account, DashboardFigures, Position, Quote};

/// Fetches and derives the dashboard figures for one session
pub struct DataAggregator<'a, A> {
    api: &'a A,
}

impl<'a, A: BrokerageApi> DataAggregator<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }

    /// Run the pipeline. `on_nlv` fires as soon as the balance is known,
    /// before positions and quotes are settled.
    pub async fn fetch_dashboard<F>(&self, token: &SessionToken, on_nlv: F) -> Result<DashboardFigures>
    where
        F: FnOnce(f64),
    {
        let accounts = self
            .api
            .list_accounts(token)
            .await
            .map_err(step_error(DashboardError::AccountsFetchFailed))?;
        let account = select_primary_account(&accounts)?;
        let account_number = account.account_number.as_str();
        debug!("Primary account {account_number} ({} accounts)", accounts.len());

        // Balance and positions only depend on the account number
        let api = self.api;
        let balance_step = async move {
            let balance = api
                .get_balance(token, account_number)
                .await
                .map_err(step_error(DashboardError::BalanceFetchFailed))?;
            on_nlv(balance.net_liquidating_value);
            Ok::<_, DashboardError>(balance)
        };
        let positions_step = async move {
            api.get_positions(token, account_number)
                .await
                .map_err(step_error(DashboardError::PositionsFetchFailed))
        };
        let (balance, positions) = futures::try_join!(balance_step, positions_step)?;

        let symbols = futures_symbols(&positions);
        let notional = if symbols.is_empty() {
            debug!("No futures positions, skipping market metrics");
            0.0
        } else {
            debug!("Fetching market metrics for {} symbols", symbols.len());
            let quotes = self
                .api
                .get_market_metrics(token, &symbols)
                .await
                .map_err(step_error(DashboardError::MetricsFetchFailed))?;
            notional_value(&positions, &quotes)
        };

        let nlv = balance.net_liquidating_value;
        let figures = DashboardFigures {
            nlv,
            notional_value: notional,
            leverage: leverage(notional, nlv),
        };
        info!(
            "Dashboard for {account_number}: NLV {:.2}, notional {:.2}, leverage {:.2}x",
            figures.nlv, figures.notional_value, figures.leverage
        );
        Ok(figures)
    }
}

/// Wrap a step failure in its variant, keeping decoding failures as they are
fn step_error(wrap: fn(String) -> DashboardError) -> impl Fn(DashboardError) -> DashboardError {
    move |err| match err {
        DashboardError::MalformedApiResponse(_) => err,
        other => wrap(other.to_string()),
    }
}

/// First account with owner authority
pub fn select_primary_account(accounts: &[Account]) -> Result<&Account> {
    accounts
        .iter()
        .find(|a| a.is_owner())
        .ok_or(DashboardError::NoPrimaryAccount)
}

/// Distinct futures symbols in first-seen order
pub fn futures_symbols(positions: &[Position]) -> Vec<String> {
    let mut symbols: Vec<String> = Vec::new();
    for position in positions.iter().filter(|p| p.is_future()) {
        if !symbols.contains(&position.symbol) {
            symbols.push(position.symbol.clone());
        }
    }
    symbols
}

/// Σ price × multiplier × |quantity| over futures with a quote.
/// Positions without a quote contribute nothing.
pub fn notional_value(positions: &[Position], quotes: &[Quote]) -> f64 {
    let mut prices: HashMap<&str, f64> = HashMap::with_capacity(quotes.len());
    for quote in quotes {
        prices
            .entry(quote.symbol.as_str())
            .or_insert(quote.last_trade_price);
    }

    positions
        .iter()
        .filter(|p| p.is_future())
        .filter_map(|p| match prices.get(p.symbol.as_str()) {
            Some(price) => Some(price * p.multiplier as f64 * p.quantity.unsigned_abs() as f64),
            None => {
                debug!("No quote for {}, excluded from notional", p.symbol);
                None
            }
        })
        .sum()
}

/// Notional over NLV; zero when NLV is not positive
pub fn leverage(notional: f64, nlv: f64) -> f64 {
    if nlv > 0.0 { notional / nlv } else { 0.0 }
}
