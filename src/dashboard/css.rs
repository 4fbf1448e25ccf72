//! Dashboard CSS styles
//!
//! One narrow column: header, then whichever of login, loader or results is
//! visible. Colors live in custom properties on `:root`.

pub const STYLES: &str = r"
*, *::before, *::after { box-sizing: border-box; }

:root {
    --page: #10141a;
    --panel: #181e27;
    --line: #2a323e;
    --ink: #d7dde5;
    --muted: #7d8794;
    --accent: #3fb68b;
    --accent-hover: #35a17a;
}

body {
    margin: 0;
    font: 15px/1.4 system-ui, -apple-system, 'Segoe UI', sans-serif;
    background: var(--page);
    color: var(--ink);
}

.container { max-width: 560px; margin: 48px auto; padding: 0 16px; }

.hidden { display: none !important; }

header { display: flex; align-items: baseline; margin-bottom: 20px; }
header h1 { margin: 0 12px 0 0; font-size: 20px; font-weight: 600; }

.refresh-time { color: var(--muted); font-size: 12px; }

/* Panels */
.card {
    background: var(--panel);
    border: 1px solid var(--line);
    border-radius: 8px;
    padding: 16px 18px;
}

.card-header { margin-bottom: 12px; }
.card-title, .metric-label { color: var(--muted); font-size: 12px; letter-spacing: 0.04em; }
.card-value { margin-top: 4px; font-size: 26px; font-variant-numeric: tabular-nums; }

.grid { display: flex; flex-direction: column; gap: 10px; }

/* Login form */
.login-form { display: flex; flex-direction: column; gap: 6px; }

.input {
    padding: 9px 10px;
    margin-bottom: 6px;
    border: 1px solid var(--line);
    border-radius: 6px;
    background: var(--page);
    color: var(--ink);
    font: inherit;
}

.input:focus { outline: none; border-color: var(--accent); }

/* Buttons */
.btn { padding: 9px 14px; border: 0; border-radius: 6px; font: inherit; cursor: pointer; }
.btn:disabled { opacity: 0.5; cursor: wait; }
.btn-primary { background: var(--accent); color: #0b1410; font-weight: 600; }
.btn-primary:hover:not(:disabled) { background: var(--accent-hover); }
.btn-secondary { background: transparent; border: 1px solid var(--line); color: var(--muted); }

.actions { display: flex; justify-content: flex-end; margin-top: 14px; }

/* Loader */
.loader { display: flex; flex-direction: column; align-items: center; gap: 10px; padding: 48px 0; }

.spinner {
    width: 28px;
    height: 28px;
    border: 3px solid var(--line);
    border-top-color: var(--accent);
    border-radius: 50%;
    animation: spin 0.9s linear infinite;
}

@keyframes spin { to { transform: rotate(360deg); } }
";
