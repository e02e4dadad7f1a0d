use app_shell::tone_class;
use leptos::*;
use view_engine::{HistoryRow, Kpi, Kpis, PopulationSummary, ProfileCard, ViewBundle};

#[component]
pub fn Card(header: &'static str, children: Children) -> impl IntoView {
    view! {
        <div class="card">
            <div class="card-header">{header}</div>
            <div class="card-body">{children()}</div>
        </div>
    }
}

#[component]
pub fn KpiCard(label: &'static str, id: &'static str, kpi: Kpi) -> impl IntoView {
    view! {
        <div class="card">
            <div class="card-body">
                <div class="kpi-label">{label}</div>
                <h3 class=format!("kpi-value {}", tone_class(kpi.tone)) id=id>{kpi.value}</h3>
            </div>
        </div>
    }
}

#[component]
pub fn KpiRow(kpis: Kpis) -> impl IntoView {
    view! {
        <div class="row row-4">
            <KpiCard label="Performance level" id="kpi-performance" kpi=kpis.performance/>
            <KpiCard label="Declared state" id="kpi-state" kpi=kpis.declared_state/>
            <KpiCard label="Evaluation" id="kpi-outcome" kpi=kpis.outcome/>
            <KpiCard label="Sessions played" id="kpi-sessions" kpi=kpis.sessions/>
        </div>
    }
}

#[component]
pub fn SummaryCard(summary: PopulationSummary) -> impl IntoView {
    view! {
        <Card header="General summary">
            <p>"Total subjects: " {summary.subjects}</p>
            <p>"Total records: " {summary.records}</p>
        </Card>
    }
}

/// Empty body when nothing is selected.
#[component]
pub fn ProfilePanel(profile: Option<ProfileCard>) -> impl IntoView {
    view! {
        <Card header="Subject profile">
            {profile.map(|p| view! {
                <h5 class="profile-name">{p.subject}</h5>
                <hr/>
                <p class="profile-line">"Age: " {p.age} " years"</p>
                <p class="profile-line">"Height: " {p.height} " cm"</p>
                <p class="profile-line">"Level: " {p.level}</p>
                <p class="profile-line">"Frequency: " {p.frequency}</p>
            })}
        </Card>
    }
}

#[component]
pub fn HistoryTable(rows: Vec<HistoryRow>) -> impl IntoView {
    let table = (!rows.is_empty()).then(move || {
        view! {
            <table class="history">
                <thead>
                    <tr>
                        <th>"Session"</th>
                        <th>"Performance"</th>
                        <th>"Declared state"</th>
                        <th>"Evaluation"</th>
                    </tr>
                </thead>
                <tbody>
                    {rows.into_iter().map(|row| view! {
                        <tr>
                            <td>{row.session}</td>
                            <td>{row.performance}</td>
                            <td>{row.declared_state}</td>
                            <td>{row.outcome}</td>
                        </tr>
                    }).collect_view()}
                </tbody>
            </table>
        }
    });
    view! {
        <Card header="Session history">
            <div class="history-scroll">{table}</div>
        </Card>
    }
}

/// Every text widget of one view; swapped wholesale when the selection changes.
#[component]
pub fn Panels(bundle: ViewBundle) -> impl IntoView {
    let ViewBundle {
        summary,
        kpis,
        recommendation,
        profile,
        history,
        ..
    } = bundle;
    view! {
        <SummaryCard summary=summary/>
        <KpiRow kpis=kpis/>
        <Card header="Personal recommendation">
            <p class="recommendation">{recommendation}</p>
        </Card>
        <div class="row row-profile">
            <ProfilePanel profile=profile/>
            <HistoryTable rows=history/>
        </div>
    }
}

#[component]
pub fn ChartCard(header: &'static str, id: &'static str) -> impl IntoView {
    view! {
        <Card header=header>
            <div class="chart" id=id></div>
        </Card>
    }
}
