//! Dashboard controller
//!
//! Owns the brokerage client, the token store and the view for one page
//! interaction, and runs login → aggregation → render. Every failure goes
//! through `handle_error`, which alerts, returns to the login view and
//! forgets the remember-token.

use std::cell::{Cell, Ref, RefCell};

use log::{error, info, warn};

use crate::aggregator::DataAggregator;
use crate::client::BrokerageApi;
use crate::error::{DashboardError, Result};
use crate::presentation::{DashboardView, Field, format_usd, render_figures};
use crate::session::{Credentials, LoginPayload, SessionManager};
use crate::storage::TokenStore;
use crate::types::DashboardFigures;

/// Application context for the dashboard
pub struct DashboardController<A, S, V> {
    api: A,
    store: S,
    view: RefCell<V>,
    in_flight: Cell<bool>,
}

/// Clears the in-flight flag on every exit path
struct InFlightGuard<'a>(&'a Cell<bool>);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl<A: BrokerageApi, S: TokenStore, V: DashboardView> DashboardController<A, S, V> {
    pub fn new(api: A, store: S, view: V) -> Self {
        Self {
            api,
            store,
            view: RefCell::new(view),
            in_flight: Cell::new(false),
        }
    }

    pub fn view(&self) -> Ref<'_, V> {
        self.view.borrow()
    }

    pub fn into_view(self) -> V {
        self.view.into_inner()
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// A login sequence is running
    pub fn is_busy(&self) -> bool {
        self.in_flight.get()
    }

    /// Page load: silent login with the stored remember-token, if any
    pub async fn resume(&self) -> Result<Option<DashboardFigures>> {
        let payload = match self.sessions().stored_payload().await {
            Ok(payload) => payload,
            Err(e) => {
                warn!("Could not read stored remember-token: {e}");
                None
            }
        };

        match payload {
            Some(payload) => self.perform_login(payload).await.map(Some),
            None => {
                self.view.borrow_mut().show_login();
                Ok(None)
            }
        }
    }

    /// Login button
    pub async fn submit_login(&self, credentials: Credentials) -> Result<DashboardFigures> {
        if !credentials.is_complete() {
            let err = DashboardError::MissingCredentials;
            self.view.borrow_mut().alert_error(&err.user_message());
            return Err(err);
        }
        self.perform_login(LoginPayload::password(credentials)).await
    }

    /// Logout button: forget the token, back to an empty login form
    pub async fn logout(&self) -> Result<()> {
        let result = self.sessions().forget().await;
        {
            let mut view = self.view.borrow_mut();
            view.show_login();
            view.clear_credentials();
        }
        info!("Logged out");
        result
    }

    fn sessions(&self) -> SessionManager<'_, A, S> {
        SessionManager::new(&self.api, &self.store)
    }

    fn begin(&self) -> Result<InFlightGuard<'_>> {
        if self.in_flight.replace(true) {
            warn!("Login requested while another is in flight, ignoring");
            return Err(DashboardError::AlreadyInFlight);
        }
        Ok(InFlightGuard(&self.in_flight))
    }

    async fn perform_login(&self, payload: LoginPayload) -> Result<DashboardFigures> {
        let _guard = self.begin()?;
        self.view.borrow_mut().show_loading();

        match self.login_and_fetch(&payload).await {
            Ok(figures) => {
                render_figures(&mut *self.view.borrow_mut(), &figures);
                Ok(figures)
            }
            Err(err) => {
                self.handle_error(&err).await;
                Err(err)
            }
        }
    }

    async fn login_and_fetch(&self, payload: &LoginPayload) -> Result<DashboardFigures> {
        let token = self.sessions().login(payload).await?;
        DataAggregator::new(&self.api)
            .fetch_dashboard(&token, |nlv| {
                self.view
                    .borrow_mut()
                    .set_field(Field::Nlv, format_usd(nlv));
            })
            .await
    }

    async fn handle_error(&self, err: &DashboardError) {
        error!("Dashboard load failed: {err}");
        {
            let mut view = self.view.borrow_mut();
            view.alert_error(&err.user_message());
            view.show_login();
        }
        if let Err(e) = self.sessions().forget().await {
            warn!("Could not clear remember-token: {e}");
        }
    }
}
