use app_shell::Palette;

/// Layout and component rules. Colours come from the palette variables prepended by
/// [`stylesheet`].
pub const GLOBAL_CSS: &str = r#"
:root {
  --border: rgba(255, 255, 255, 0.08);
  --border-strong: rgba(255, 255, 255, 0.16);
  --text-muted: #8b93a7;
  --surface-hover: rgba(255, 255, 255, 0.05);
  --shadow-soft: 0 14px 42px rgba(0, 0, 0, 0.38);
  --radius: 10px;
  --space-1: 4px;
  --space-2: 8px;
  --space-3: 12px;
  --space-4: 16px;
  --font-body: "Inter", "SF Pro Text", system-ui, -apple-system, sans-serif;
  --font-size-xs: 11px;
  --font-size-sm: 13px;
  --font-size-md: 15px;
  --font-size-lg: 17px;
}

* { box-sizing: border-box; }
html, body {
  padding: 0;
  margin: 0;
  background: var(--bg);
  color: var(--text);
  font-family: var(--font-body);
  font-size: var(--font-size-sm);
  line-height: 1.4;
  min-height: 100%;
}

select {
  width: 100%;
  background: #2a2a4a;
  border: 1px solid var(--border);
  color: var(--text);
  padding: var(--space-2) var(--space-3);
  border-radius: var(--radius);
  font-size: var(--font-size-sm);
  outline: none;
}
select:focus { border-color: var(--accent); }

.dashboard { display: flex; flex-direction: column; gap: var(--space-4); padding: var(--space-4); max-width: 1400px; margin: 0 auto; }
.page-title { text-align: center; color: var(--accent); margin: var(--space-3) 0 var(--space-1); }
.page-subtitle { text-align: center; color: var(--text-muted); margin: 0; }

.row { display: grid; gap: var(--space-4); }
.row-2 { grid-template-columns: repeat(2, minmax(0, 1fr)); }
.row-4 { grid-template-columns: repeat(4, minmax(0, 1fr)); }
.row-profile { grid-template-columns: minmax(0, 1fr) minmax(0, 2fr); }

.card { background: var(--card); border: 1px solid var(--border); border-radius: var(--radius); box-shadow: var(--shadow-soft); overflow: hidden; }
.card-header { background: var(--primary); padding: var(--space-2) var(--space-3); font-weight: 600; letter-spacing: 0.02em; }
.card-body { padding: var(--space-3); }

.kpi-label { font-size: var(--font-size-xs); color: var(--text-muted); text-transform: uppercase; letter-spacing: 0.04em; }
.kpi-value { font-size: 26px; font-weight: 700; text-align: center; margin: var(--space-2) 0 0; }
.tone-neutral { color: var(--text); }
.tone-accent { color: var(--accent); }
.tone-success { color: var(--success); }
.tone-warning { color: var(--warning); }
.tone-danger { color: var(--danger); }
.panels { display: flex; flex-direction: column; gap: var(--space-4); }
.recommendation { font-size: var(--font-size-lg); margin: 0; }
.chart { width: 100%; height: 380px; }
.chart-empty { display: flex; align-items: center; justify-content: center; height: 380px; color: var(--text-muted); }

.profile-name { color: var(--accent); margin: 0 0 var(--space-2); }
.profile-line { margin: var(--space-1) 0; }
.history-scroll { max-height: 300px; overflow-y: auto; }
table.history { width: 100%; border-collapse: collapse; }
table.history th, table.history td { border: 1px solid var(--border); padding: var(--space-2); text-align: left; }
table.history tbody tr:nth-child(odd) { background: var(--surface-hover); }
table.history tbody tr:hover { background: var(--border-strong); }

.footer { text-align: center; color: var(--text-muted); border-top: 1px solid var(--border); padding-top: var(--space-3); }

.notice { max-width: 720px; margin: 80px auto; padding: var(--space-4); }
.notice h1 { text-align: center; }
.notice .lead { font-size: var(--font-size-lg); }
.notice code { color: var(--warning); }

@media (max-width: 1100px) {
  .row-4 { grid-template-columns: repeat(2, minmax(0, 1fr)); }
  .row-2, .row-profile { grid-template-columns: 1fr; }
}

@media (max-width: 640px) {
  .dashboard { padding: var(--space-2); gap: var(--space-2); }
  .row-4 { grid-template-columns: 1fr; }
}
"#;

/// Full stylesheet: palette variables followed by the static rules.
pub fn stylesheet(palette: &Palette) -> String {
    let mut css = palette.css_variables();
    css.push_str(GLOBAL_CSS);
    css
}
