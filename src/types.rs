//! Common types for the dashboard
//!
//! Wire records mirror the tastytrade JSON (kebab-case, numbers as strings).
//! Each converts into a typed domain record through `parse`, which is the
//! only place API numerics are interpreted.

use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, Result};

/// Instrument type that counts toward notional exposure
pub const FUTURE_INSTRUMENT: &str = "Future";

/// Authority level of the account the dashboard reports on
pub const OWNER_AUTHORITY: &str = "owner";

/// `{ "data": ... }` wrapper around every tastytrade response
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    pub data: T,
}

/// `{ "items": [...] }` list payload
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ItemList<T> {
    #[serde(default)]
    pub items: Vec<T>,
}

/// Numeric field that may arrive as a JSON string or a JSON number
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumericField {
    Text(String),
    Number(f64),
}

impl NumericField {
    /// Parse as a finite decimal
    pub fn to_f64(&self, field: &str) -> Result<f64> {
        let value = match self {
            NumericField::Text(text) => text.trim().parse::<f64>().map_err(|_| {
                DashboardError::MalformedApiResponse(format!("{field} is not a number: {text:?}"))
            })?,
            NumericField::Number(n) => *n,
        };
        if value.is_finite() {
            Ok(value)
        } else {
            Err(DashboardError::MalformedApiResponse(format!(
                "{field} is not finite: {value}"
            )))
        }
    }

    /// Parse as an integer; integral decimals like `"50.0"` are accepted
    pub fn to_i64(&self, field: &str) -> Result<i64> {
        if let NumericField::Text(text) = self {
            if let Ok(n) = text.trim().parse::<i64>() {
                return Ok(n);
            }
        }
        let value = self.to_f64(field)?;
        if value.fract() != 0.0 || value.abs() > 9.0e15 {
            return Err(DashboardError::MalformedApiResponse(format!(
                "{field} is not an integer: {value}"
            )));
        }
        Ok(value as i64)
    }
}

// ============================================================================
// Wire records
// ============================================================================

/// `data` of POST /sessions
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SessionData {
    pub session_token: String,
    #[serde(default)]
    pub remember_token: Option<String>,
}

/// Item of GET /customers/me/accounts
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AccountItem {
    pub account: AccountRecord,
    #[serde(alias = "authority_level", default)]
    pub authority_level: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AccountRecord {
    pub account_number: String,
}

/// `data` of GET /accounts/{acct}/balances
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BalanceData {
    pub net_liquidating_value: NumericField,
}

/// Item of GET /accounts/{acct}/positions
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PositionRecord {
    pub symbol: String,
    pub instrument_type: String,
    pub multiplier: NumericField,
    pub quantity: NumericField,
}

/// Body of POST /market-metrics
#[derive(Debug, Serialize)]
pub struct MarketMetricsRequest<'a> {
    pub symbols: &'a [String],
}

/// Item of POST /market-metrics
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MarketMetricRecord {
    pub symbol: String,
    #[serde(default)]
    pub last_trade_price: Option<NumericField>,
}

// ============================================================================
// Domain records
// ============================================================================

/// Brokerage account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub account_number: String,
    pub authority_level: String,
}

impl Account {
    pub fn is_owner(&self) -> bool {
        self.authority_level == OWNER_AUTHORITY
    }
}

impl From<AccountItem> for Account {
    fn from(item: AccountItem) -> Self {
        Self {
            account_number: item.account.account_number,
            authority_level: item.authority_level,
        }
    }
}

/// Account balance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Balance {
    pub net_liquidating_value: f64,
}

impl BalanceData {
    pub fn parse(self) -> Result<Balance> {
        Ok(Balance {
            net_liquidating_value: self.net_liquidating_value.to_f64("net-liquidating-value")?,
        })
    }
}

/// Open position; `quantity` is signed (negative = short)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub symbol: String,
    pub instrument_type: String,
    pub multiplier: i64,
    pub quantity: i64,
}

impl Position {
    pub fn is_future(&self) -> bool {
        self.instrument_type == FUTURE_INSTRUMENT
    }
}

impl PositionRecord {
    pub fn is_future(&self) -> bool {
        self.instrument_type == FUTURE_INSTRUMENT
    }

    pub fn parse(self) -> Result<Position> {
        let multiplier = self.multiplier.to_i64("multiplier")?;
        let quantity = self.quantity.to_i64("quantity")?;
        Ok(Position {
            symbol: self.symbol,
            instrument_type: self.instrument_type,
            multiplier,
            quantity,
        })
    }
}

/// Parse the futures positions of a positions payload.
///
/// Other instrument types never feed the figures and may carry fractional
/// quantities (fractional shares), so they are dropped unparsed.
pub fn parse_futures_positions(records: Vec<PositionRecord>) -> Result<Vec<Position>> {
    records
        .into_iter()
        .filter(PositionRecord::is_future)
        .map(PositionRecord::parse)
        .collect()
}

/// Last traded price for a symbol
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub symbol: String,
    pub last_trade_price: f64,
}

impl MarketMetricRecord {
    /// `Ok(None)` when the API reported no last trade for the symbol
    pub fn parse(self) -> Result<Option<Quote>> {
        match self.last_trade_price {
            Some(price) => Ok(Some(Quote {
                last_trade_price: price.to_f64("last-trade-price")?,
                symbol: self.symbol,
            })),
            None => Ok(None),
        }
    }
}

/// Figures shown on the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DashboardFigures {
    pub nlv: f64,
    pub notional_value: f64,
    pub leverage: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_field_accepts_strings_and_numbers() {
        let text = NumericField::Text("10000.50".into());
        assert!((text.to_f64("nlv").unwrap() - 10_000.5).abs() < 1e-9);

        let number = NumericField::Number(42.0);
        assert_eq!(number.to_i64("multiplier").unwrap(), 42);

        let integral = NumericField::Text("50.0".into());
        assert_eq!(integral.to_i64("multiplier").unwrap(), 50);

        let negative = NumericField::Text("-2".into());
        assert_eq!(negative.to_i64("quantity").unwrap(), -2);
    }

    #[test]
    fn test_numeric_field_rejects_garbage() {
        let garbage = NumericField::Text("abc".into());
        assert!(matches!(
            garbage.to_f64("nlv"),
            Err(DashboardError::MalformedApiResponse(_))
        ));

        let nan = NumericField::Text("NaN".into());
        assert!(matches!(
            nan.to_f64("nlv"),
            Err(DashboardError::MalformedApiResponse(_))
        ));

        let fractional = NumericField::Text("1.5".into());
        assert!(matches!(
            fractional.to_i64("quantity"),
            Err(DashboardError::MalformedApiResponse(_))
        ));
    }

    #[test]
    fn test_account_deserialization() {
        let json = r#"{"data":{"items":[
            {"account":{"account-number":"5WX1"},"authority-level":"owner"},
            {"account":{"account-number":"5WX2"},"authority_level":"trade-only"}
        ]}}"#;
        let envelope: ApiEnvelope<ItemList<AccountItem>> =
            serde_json::from_str(json).expect("accounts should decode");
        let accounts: Vec<Account> = envelope.data.items.into_iter().map(Account::from).collect();

        assert_eq!(accounts.len(), 2);
        assert!(accounts[0].is_owner());
        assert_eq!(accounts[1].authority_level, "trade-only");
        assert!(!accounts[1].is_owner());
    }

    #[test]
    fn test_position_parse() {
        let json = r#"{"symbol":"/ESZ4","instrument-type":"Future","multiplier":"50","quantity":"-2"}"#;
        let record: PositionRecord = serde_json::from_str(json).expect("position should decode");
        let position = record.parse().expect("position should parse");

        assert!(position.is_future());
        assert_eq!(position.multiplier, 50);
        assert_eq!(position.quantity, -2);
    }

    #[test]
    fn test_fractional_equity_position_is_ignored() {
        let json = r#"{"data":{"items":[
            {"symbol":"/ESZ4","instrument-type":"Future","multiplier":"50","quantity":"-2"},
            {"symbol":"AAPL","instrument-type":"Equity","multiplier":"1","quantity":"0.5"}
        ]}}"#;
        let envelope: ApiEnvelope<ItemList<PositionRecord>> =
            serde_json::from_str(json).expect("positions should decode");

        let positions = parse_futures_positions(envelope.data.items).expect("futures should parse");
        assert_eq!(positions.len(), 1);
        assert_eq!(positions[0].symbol, "/ESZ4");
        assert_eq!(positions[0].quantity, -2);
    }

    #[test]
    fn test_fractional_future_quantity_is_malformed() {
        let json = r#"[{"symbol":"/ESZ4","instrument-type":"Future","multiplier":"50","quantity":"1.5"}]"#;
        let records: Vec<PositionRecord> = serde_json::from_str(json).expect("position should decode");
        assert!(matches!(
            parse_futures_positions(records),
            Err(DashboardError::MalformedApiResponse(_))
        ));
    }

    #[test]
    fn test_empty_item_list_defaults() {
        let envelope: ApiEnvelope<ItemList<MarketMetricRecord>> =
            serde_json::from_str(r#"{"data":{}}"#).expect("empty list should decode");
        assert!(envelope.data.items.is_empty());
    }

    #[test]
    fn test_metric_without_price_is_not_a_quote() {
        let json = r#"{"symbol":"/CL","last-trade-price":null}"#;
        let record: MarketMetricRecord = serde_json::from_str(json).expect("metric should decode");
        assert_eq!(record.parse().unwrap(), None);
    }

    #[test]
    fn test_metrics_request_serialization() {
        let symbols = vec!["/ES".to_string(), "/NQ".to_string()];
        let body = MarketMetricsRequest { symbols: &symbols };
        let json = serde_json::to_string(&body).expect("request should serialize");
        assert_eq!(json, r#"{"symbols":["/ES","/NQ"]}"#);
    }
}
