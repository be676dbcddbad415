//! Stock Insight Dashboard - WASM entry point
//!
//! Mounts the dashboard with a deterministic demo analysis and watchlist.

mod dashboard;
mod demo;

use dashboard::Dashboard;
use insight_state::{provide_analysis_state, WatchlistState};
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();

    tracing::info!("starting Stock Insight dashboard");
    leptos::mount::mount_to_body(App);
}

#[component]
fn App() -> impl IntoView {
    let analysis = provide_analysis_state();
    let watchlist = WatchlistState::new();
    provide_context(watchlist);

    watchlist.set_entries(demo::watchlist());
    watchlist.select("ACME");

    analysis.begin_loading();
    match demo::default_analysis_json() {
        Ok(json) => {
            // Rejections are already reported through the chart error
            let _ = analysis.load_json(&json);
        }
        Err(err) => analysis.set_error(format!("could not build demo analysis: {err}")),
    }

    view! { <Dashboard /> }
}
