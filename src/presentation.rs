//! Presentation adapter
//!
//! `DashboardView` is the display sink the controller drives. The worker
//! implementation is `ViewState`: a serializable snapshot the page applies
//! to the DOM as-is. No business logic lives here, only section toggling and
//! number formatting.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::types::DashboardFigures;

/// Read-only display targets, serialized as their DOM element ids
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Field {
    Nlv,
    NotionalValue,
    Leverage,
}

impl Field {
    pub fn element_id(self) -> &'static str {
        match self {
            Field::Nlv => "nlv",
            Field::NotionalValue => "notional-value",
            Field::Leverage => "leverage",
        }
    }
}

/// Which part of the page is visible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    #[default]
    Login,
    Loading,
    Results,
}

/// Display sink driven by the controller
pub trait DashboardView {
    fn show_loading(&mut self);
    fn show_login(&mut self);
    fn show_results(&mut self);
    fn set_field(&mut self, field: Field, value: String);
    fn alert_error(&mut self, message: &str);
    /// Wipe the username/password inputs
    fn clear_credentials(&mut self);
}

/// View snapshot returned to the browser
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ViewState {
    pub section: Section,
    pub fields: BTreeMap<Field, String>,
    pub alerts: Vec<String>,
    pub clear_credentials: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refreshed_at: Option<String>,
}

impl ViewState {
    pub fn field(&self, field: Field) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }
}

impl DashboardView for ViewState {
    fn show_loading(&mut self) {
        self.section = Section::Loading;
    }

    fn show_login(&mut self) {
        self.section = Section::Login;
    }

    fn show_results(&mut self) {
        self.section = Section::Results;
        self.refreshed_at = Some(chrono::Utc::now().to_rfc3339());
    }

    fn set_field(&mut self, field: Field, value: String) {
        self.fields.insert(field, value);
    }

    fn alert_error(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }

    fn clear_credentials(&mut self) {
        self.clear_credentials = true;
    }
}

/// Write notional and leverage, then reveal the results
pub fn render_figures<V: DashboardView + ?Sized>(view: &mut V, figures: &DashboardFigures) {
    view.set_field(Field::NotionalValue, format_usd(figures.notional_value));
    view.set_field(Field::Leverage, format_leverage(figures.leverage));
    view.show_results();
}

/// en-US dollars: `$10,000.00`, `-$1,234.56`
pub fn format_usd(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let dollars = (cents / 100).to_string();
    let remainder = cents % 100;

    let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
    for (i, ch) in dollars.chars().enumerate() {
        if i > 0 && (dollars.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}${grouped}.{remainder:02}")
}

/// Two decimals with an `x` suffix: `45.00x`
pub fn format_leverage(value: f64) -> String {
    format!("{value:.2}x")
}
