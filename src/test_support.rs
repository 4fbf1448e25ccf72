//! In-crate fakes for the brokerage API

use std::cell::RefCell;

use crate::client::BrokerageApi;
use crate::error::{DashboardError, Result};
use crate::session::{LoginPayload, SessionToken};
use crate::types::{Account, Balance, Position, Quote, SessionData};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginBehavior {
    #[default]
    Ok,
    NoRememberToken,
    Unauthorized,
    ServerError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Accounts,
    Balance,
    Positions,
    Metrics,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    /// Non-success HTTP status
    Status,
    /// Body decoded but a field was invalid
    Malformed,
}

/// Scripted brokerage; defaults to the single-contract /ES scenario
pub struct FakeBrokerage {
    pub login: LoginBehavior,
    pub accounts: Vec<Account>,
    pub nlv: f64,
    pub positions: Vec<Position>,
    pub quotes: Vec<Quote>,
    pub failure: Option<(Step, Failure)>,
    /// Suspend once inside `create_session`
    pub yield_on_login: bool,
    pub calls: RefCell<Vec<String>>,
    pub metrics_requests: RefCell<Vec<Vec<String>>>,
}

impl Default for FakeBrokerage {
    fn default() -> Self {
        Self {
            login: LoginBehavior::Ok,
            accounts: vec![account("5WX1", "owner")],
            nlv: 10_000.0,
            positions: vec![position("/ES", "Future", 50, -2)],
            quotes: vec![quote("/ES", 4500.0)],
            failure: None,
            yield_on_login: false,
            calls: RefCell::new(Vec::new()),
            metrics_requests: RefCell::new(Vec::new()),
        }
    }
}

pub fn account(number: &str, authority: &str) -> Account {
    Account {
        account_number: number.to_string(),
        authority_level: authority.to_string(),
    }
}

pub fn position(symbol: &str, instrument: &str, multiplier: i64, quantity: i64) -> Position {
    Position {
        symbol: symbol.to_string(),
        instrument_type: instrument.to_string(),
        multiplier,
        quantity,
    }
}

pub fn quote(symbol: &str, price: f64) -> Quote {
    Quote {
        symbol: symbol.to_string(),
        last_trade_price: price,
    }
}

impl FakeBrokerage {
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn called(&self, prefix: &str) -> bool {
        self.calls.borrow().iter().any(|c| c.starts_with(prefix))
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.borrow_mut().push(call.into());
    }

    fn check(&self, step: Step) -> Result<()> {
        match self.failure {
            Some((failing, Failure::Status)) if failing == step => Err(DashboardError::Api {
                status: 500,
                message: format!("{step:?} unavailable"),
            }),
            Some((failing, Failure::Malformed)) if failing == step => Err(
                DashboardError::MalformedApiResponse(format!("{step:?} field is not a number")),
            ),
            _ => Ok(()),
        }
    }
}

impl BrokerageApi for FakeBrokerage {
    async fn create_session(&self, payload: &LoginPayload) -> Result<SessionData> {
        self.record(format!("create_session:{}", payload.kind()));
        if self.yield_on_login {
            tokio::task::yield_now().await;
        }
        match self.login {
            LoginBehavior::Ok => Ok(SessionData {
                session_token: "session-1".to_string(),
                remember_token: Some("remember-1".to_string()),
            }),
            LoginBehavior::NoRememberToken => Ok(SessionData {
                session_token: "session-1".to_string(),
                remember_token: None,
            }),
            LoginBehavior::Unauthorized => Err(DashboardError::InvalidCredentials),
            LoginBehavior::ServerError => Err(DashboardError::LoginFailed("HTTP 500".into())),
        }
    }

    async fn list_accounts(&self, _token: &SessionToken) -> Result<Vec<Account>> {
        self.record("list_accounts");
        self.check(Step::Accounts)?;
        Ok(self.accounts.clone())
    }

    async fn get_balance(&self, _token: &SessionToken, account_number: &str) -> Result<Balance> {
        self.record(format!("get_balance:{account_number}"));
        self.check(Step::Balance)?;
        Ok(Balance {
            net_liquidating_value: self.nlv,
        })
    }

    async fn get_positions(
        &self,
        _token: &SessionToken,
        account_number: &str,
    ) -> Result<Vec<Position>> {
        self.record(format!("get_positions:{account_number}"));
        self.check(Step::Positions)?;
        Ok(self.positions.clone())
    }

    async fn get_market_metrics(
        &self,
        _token: &SessionToken,
        symbols: &[String],
    ) -> Result<Vec<Quote>> {
        self.record("get_market_metrics");
        self.metrics_requests.borrow_mut().push(symbols.to_vec());
        self.check(Step::Metrics)?;
        Ok(self.quotes.clone())
    }
}
