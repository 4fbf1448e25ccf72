//! Dashboard JavaScript
//!
//! Thin display sink. All decisions are made by the worker; the page only:
//! - posts the login form, resume and logout requests
//! - applies the returned view state (section, field texts, alerts)
//! - disables the login button while a request is running

pub const SCRIPT: &str = r#"
// ============================================================================
// Configuration
// ============================================================================
const CONFIG = {
    apiBase: ''
};

// ============================================================================
// State
// ============================================================================
let busy = false;

const el = (id) => document.getElementById(id);

// ============================================================================
// API Functions
// ============================================================================
async function postJSON(endpoint, body) {
    const res = await fetch(CONFIG.apiBase + endpoint, {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: body ? JSON.stringify(body) : null
    });
    return await res.json();
}

// ============================================================================
// View Application
// ============================================================================
function showSection(section) {
    el('login-section').classList.toggle('hidden', section !== 'login');
    el('loader').classList.toggle('hidden', section !== 'loading');
    el('results-section').classList.toggle('hidden', section !== 'results');
}

function applyView(view) {
    if (!view) return;

    for (const [id, text] of Object.entries(view.fields || {})) {
        const target = el(id);
        if (target) target.textContent = text;
    }

    if (view.clear_credentials) {
        el('username').value = '';
        el('password').value = '';
    }

    if (view.refreshed_at) {
        el('refreshTime').textContent = 'Updated: ' + new Date(view.refreshed_at).toLocaleTimeString();
    }

    for (const message of view.alerts || []) {
        alert('Error: ' + message);
    }

    showSection(view.section);
}

async function run(endpoint, body) {
    if (busy) return;
    busy = true;
    el('login-btn').disabled = true;
    showSection('loading');

    try {
        applyView(await postJSON(endpoint, body));
    } catch (e) {
        alert('Error: ' + e.message);
        showSection('login');
    } finally {
        busy = false;
        el('login-btn').disabled = false;
    }
}

// ============================================================================
// Button Actions
// ============================================================================
el('login-btn').addEventListener('click', () => {
    const username = el('username').value;
    const password = el('password').value;
    if (!username || !password) {
        alert('Please enter both username and password.');
        return;
    }
    run('/api/session/login', { username, password });
});

el('logout-btn').addEventListener('click', () => {
    run('/api/session/logout');
});

// ============================================================================
// Initialization
// ============================================================================
run('/api/session/resume');
"#;
