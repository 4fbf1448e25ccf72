//! Dashboard HTML template
//!
//! Three mutually exclusive sections: login form, loader, results.
//! Element ids match `presentation::Field::element_id`.

pub const TEMPLATE: &str = r#"
    <div class="container">
        <header>
            <div>
                <h1>📐 Futures Leverage</h1>
                <span class="refresh-time" id="refreshTime"></span>
            </div>
        </header>

        <!-- Login -->
        <section class="card" id="login-section">
            <div class="card-header">
                <span class="card-title">🔐 tastytrade Login</span>
            </div>
            <form class="login-form" onsubmit="return false;">
                <label class="metric-label" for="username">Username</label>
                <input class="input" type="text" id="username" autocomplete="username">
                <label class="metric-label" for="password">Password</label>
                <input class="input" type="password" id="password" autocomplete="current-password">
                <button class="btn btn-primary" type="submit" id="login-btn">Log In</button>
            </form>
        </section>

        <!-- Loader -->
        <div class="loader hidden" id="loader">
            <div class="spinner"></div>
            <span class="refresh-time">Loading account data...</span>
        </div>

        <!-- Results -->
        <section class="hidden" id="results-section">
            <div class="grid">
                <div class="card">
                    <div class="card-title">💰 Net Liquidating Value</div>
                    <div class="card-value" id="nlv">$--</div>
                </div>
                <div class="card">
                    <div class="card-title">📊 Notional Value</div>
                    <div class="card-value" id="notional-value">$--</div>
                </div>
                <div class="card">
                    <div class="card-title">⚖️ Leverage</div>
                    <div class="card-value" id="leverage">--x</div>
                </div>
            </div>
            <div class="actions">
                <button class="btn btn-secondary" id="logout-btn">Log Out</button>
            </div>
        </section>
    </div>
"#;
