//! tastytrade REST API client
//!
//! Implements the five calls the dashboard needs:
//! - Session creation (password or remember-token)
//! - Customer accounts
//! - Account balances and positions
//! - Market metrics for a batch of symbols
//!
//! `BrokerageApi` is the seam the session manager and aggregator are written
//! against; `TastytradeClient` is the HTTP implementation.

use log::debug;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{DashboardError, Result};
use crate::session::{LoginPayload, SessionToken};
use crate::types::{
    Account, AccountItem, ApiEnvelope, Balance, BalanceData, ItemList, MarketMetricRecord,
    MarketMetricsRequest, Position, PositionRecord, Quote, SessionData, parse_futures_positions,
};

/// Brokerage operations used by the dashboard
///
/// Futures are not `Send`: the Workers runtime is single-threaded.
#[allow(async_fn_in_trait)]
pub trait BrokerageApi {
    /// POST /sessions. Fails with `InvalidCredentials` on 401 and
    /// `LoginFailed` on anything else that is not a success.
    async fn create_session(&self, payload: &LoginPayload) -> Result<SessionData>;

    /// GET /customers/me/accounts
    async fn list_accounts(&self, token: &SessionToken) -> Result<Vec<Account>>;

    /// GET /accounts/{acct}/balances
    async fn get_balance(&self, token: &SessionToken, account_number: &str) -> Result<Balance>;

    /// GET /accounts/{acct}/positions; only futures positions are returned
    async fn get_positions(&self, token: &SessionToken, account_number: &str)
    -> Result<Vec<Position>>;

    /// POST /market-metrics; symbols without a last trade are omitted
    async fn get_market_metrics(&self, token: &SessionToken, symbols: &[String])
    -> Result<Vec<Quote>>;
}

/// tastytrade API client
pub struct TastytradeClient {
    http: reqwest::Client,
    base_url: String,
    user_agent: String,
}

impl TastytradeClient {
    /// Create new client from configuration
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.api_base_url.clone(),
            user_agent: config.user_agent.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Perform GET request with session authorization
    async fn get<T: for<'de> Deserialize<'de>>(&self, token: &SessionToken, path: &str) -> Result<T> {
        debug!("GET {path}");
        let response = self
            .http
            .get(self.url(path))
            .header("Authorization", token.as_str())
            .header("User-Agent", &self.user_agent)
            .header("Content-Type", "application/json")
            .send()
            .await?;

        Self::handle_response(response).await
    }

    /// Perform POST request with session authorization
    async fn post<T: for<'de> Deserialize<'de>, B: Serialize>(
        &self,
        token: &SessionToken,
        path: &str,
        body: &B,
    ) -> Result<T> {
        debug!("POST {path}");
        let response = self
            .http
            .post(self.url(path))
            .header("Authorization", token.as_str())
            .header("User-Agent", &self.user_agent)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await?;

        Self::handle_response(response).await
    }

    /// Handle API response, checking for errors
    async fn handle_response<T: for<'de> Deserialize<'de>>(response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".into());
            return Err(DashboardError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response.json().await.map_err(DashboardError::from)
    }
}

impl BrokerageApi for TastytradeClient {
    async fn create_session(&self, payload: &LoginPayload) -> Result<SessionData> {
        debug!("POST /sessions ({})", payload.kind());
        let response = self
            .http
            .post(self.url("/sessions"))
            .header("User-Agent", &self.user_agent)
            .header("Content-Type", "application/json")
            .json(payload)
            .send()
            .await
            .map_err(|e| DashboardError::LoginFailed(e.to_string()))?;

        if let Some(err) = session_error(response.status()) {
            return Err(err);
        }

        let envelope: ApiEnvelope<SessionData> = response.json().await?;
        Ok(envelope.data)
    }

    async fn list_accounts(&self, token: &SessionToken) -> Result<Vec<Account>> {
        let envelope: ApiEnvelope<ItemList<AccountItem>> =
            self.get(token, "/customers/me/accounts").await?;
        Ok(envelope.data.items.into_iter().map(Account::from).collect())
    }

    async fn get_balance(&self, token: &SessionToken, account_number: &str) -> Result<Balance> {
        let path = format!("/accounts/{account_number}/balances");
        let envelope: ApiEnvelope<BalanceData> = self.get(token, &path).await?;
        envelope.data.parse()
    }

    async fn get_positions(
        &self,
        token: &SessionToken,
        account_number: &str,
    ) -> Result<Vec<Position>> {
        let path = format!("/accounts/{account_number}/positions");
        let envelope: ApiEnvelope<ItemList<PositionRecord>> = self.get(token, &path).await?;
        parse_futures_positions(envelope.data.items)
    }

    async fn get_market_metrics(
        &self,
        token: &SessionToken,
        symbols: &[String],
    ) -> Result<Vec<Quote>> {
        let body = MarketMetricsRequest { symbols };
        let envelope: ApiEnvelope<ItemList<MarketMetricRecord>> =
            self.post(token, "/market-metrics", &body).await?;

        let mut quotes = Vec::with_capacity(envelope.data.items.len());
        for record in envelope.data.items {
            let symbol = record.symbol.clone();
            match record.parse()? {
                Some(quote) => quotes.push(quote),
                None => debug!("No last trade reported for {symbol}"),
            }
        }
        Ok(quotes)
    }
}

/// Error for a POST /sessions status, `None` on success
fn session_error(status: StatusCode) -> Option<DashboardError> {
    if status == StatusCode::UNAUTHORIZED {
        Some(DashboardError::InvalidCredentials)
    } else if !status.is_success() {
        Some(DashboardError::LoginFailed(format!("HTTP {status}")))
    } else {
        None
    }
}
