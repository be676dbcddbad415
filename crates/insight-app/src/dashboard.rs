//! Main dashboard layout component

use crate::demo;
use insight_charts::{PriceChart, PriceChartConfig, Sparkline, SparklineConfig};
use insight_core::{
    format_percent, Annotation, AnalysisPayload, PriceFormat, PriceSeries, ValueFormat,
    VolumeFormat,
};
use insight_state::{use_analysis_state, AnalysisState, WatchlistEntry, WatchlistState};
use leptos::prelude::*;

/// Load the analysis for `symbol` into the main chart
fn load_symbol(analysis: AnalysisState, watchlist: WatchlistState, symbol: &str) {
    analysis.begin_loading();
    watchlist.select(symbol);

    match demo::profile(symbol) {
        Some((price, vol)) => match demo::analysis_json(symbol, price, vol) {
            Ok(json) => {
                // Rejections are already reported through the chart error
                let _ = analysis.load_json(&json);
            }
            Err(err) => analysis.set_error(format!("could not build analysis: {err}")),
        },
        // Listings without history still load so the chart shows its placeholder
        None => match watchlist.selected_entry() {
            Some(entry) => {
                let mut payload = AnalysisPayload::new(entry.points, Vec::new());
                payload.symbol = Some(entry.symbol);
                analysis.load_payload(payload);
            }
            None => analysis.set_error(format!("unknown symbol {symbol}")),
        },
    }
}

#[component]
pub fn Dashboard() -> impl IntoView {
    let analysis = use_analysis_state();
    let watchlist = expect_context::<WatchlistState>();
    let hovered = RwSignal::new(None::<usize>);

    let on_hover = Callback::new(move |index: Option<usize>| hovered.set(index));

    view! {
        <div class="dashboard">
            <header class="dash-header">
                <SymbolHeader analysis=analysis hovered=hovered.into() />
                <div class="dash-actions">
                    <button
                        class="btn"
                        on:click=move |_| {
                            let symbol = analysis
                                .symbol
                                .get_untracked()
                                .unwrap_or_else(|| "ACME".to_string());
                            load_symbol(analysis, watchlist, &symbol);
                        }
                    >
                        "Reload"
                    </button>
                    <button
                        class="btn btn-warn"
                        on:click=move |_| analysis.set_error("Analysis service unavailable")
                    >
                        "Simulate error"
                    </button>
                </div>
            </header>

            <main class="dash-main">
                <section class="dash-center">
                    <div class="panel chart-container">
                        <div class="panel-header">
                            <span class="panel-title">"Price"</span>
                        </div>
                        <div class="panel-content">
                            <PriceChart
                                points=analysis.points
                                annotations=analysis.annotations
                                is_loading=analysis.loading
                                error=analysis.error
                                config=PriceChartConfig::default()
                                on_hover=on_hover
                            />
                        </div>
                    </div>

                    <div class="panel legend-container">
                        <div class="panel-header">
                            <span class="panel-title">"Analysis"</span>
                        </div>
                        <div class="panel-content">
                            <AnnotationLegend annotations=analysis.annotations.into() />
                        </div>
                    </div>
                </section>

                <aside class="dash-sidebar right">
                    <div class="panel">
                        <div class="panel-header">
                            <span class="panel-title">"Watchlist"</span>
                        </div>
                        <div class="panel-content">
                            <Watchlist analysis=analysis watchlist=watchlist />
                        </div>
                    </div>
                </aside>
            </main>
        </div>
    }
}

/// Symbol, last close and either the window change or the hovered point
#[component]
fn SymbolHeader(analysis: AnalysisState, hovered: Signal<Option<usize>>) -> impl IntoView {
    let prices = PriceFormat::default();
    let series = Memo::new(move |_| PriceSeries::new(analysis.points.get()));

    let readout = move || {
        series.with(|s| {
            let index = hovered.get().or_else(|| s.len().checked_sub(1))?;
            let point = s.get(index)?;
            let change = s.change_percent_at(index).map(format_percent).unwrap_or_default();
            let volume = point
                .volume
                .map(|v| format!("Vol {}", VolumeFormat.format(v)))
                .unwrap_or_default();
            Some((point.date_label(), prices.format(point.close), change, volume, s.is_positive()))
        })
    };

    view! {
        <div class="symbol-header">
            <span class="symbol">
                {move || analysis.symbol.get().unwrap_or_else(|| "--".to_string())}
            </span>
            {move || {
                readout().map(|(date, close, change, volume, positive)| {
                    let class = if positive { "change bull" } else { "change bear" };
                    view! {
                        <span class="date">{date}</span>
                        <span class="price">{close}</span>
                        <span class=class>{change}</span>
                        <span class="volume">{volume}</span>
                    }
                })
            }}
        </div>
    }
}

/// Plain list of the annotations currently on the chart
#[component]
fn AnnotationLegend(annotations: Signal<Vec<Annotation>>) -> impl IntoView {
    let prices = PriceFormat::default();

    view! {
        <ul class="annotation-legend">
            {move || {
                annotations
                    .get()
                    .into_iter()
                    .map(|annotation| match annotation {
                        Annotation::Level(level) => view! {
                            <li class=format!("legend-level {}", level.kind.css_class())>
                                <span
                                    class="swatch"
                                    style=format!("background: {}", level.kind.color())
                                ></span>
                                {format!(
                                    "{} {} ({})",
                                    level.kind.label(),
                                    prices.format(level.price),
                                    level.strength.label(),
                                )}
                            </li>
                        }
                        .into_any(),
                        Annotation::Event(event) => {
                            let color = event.color();
                            let arrow = event.direction.map(|d| d.arrow()).unwrap_or("•");
                            let title = format!("{} {} · {}", arrow, event.kind.label(), event.date);
                            let swatch = format!("background: {color}");
                            view! {
                                <li class="legend-event">
                                    <span class="swatch" style=swatch></span>
                                    <span class="legend-title">{title}</span>
                                    <span class="legend-desc">{event.description}</span>
                                </li>
                            }
                            .into_any()
                        }
                    })
                    .collect_view()
            }}
        </ul>
    }
}

#[component]
fn Watchlist(analysis: AnalysisState, watchlist: WatchlistState) -> impl IntoView {
    let prices = PriceFormat::default();

    view! {
        <table class="watchlist">
            <tbody>
                <For
                    each=move || watchlist.entries.get()
                    key=|entry: &WatchlistEntry| entry.symbol.clone()
                    children=move |entry: WatchlistEntry| {
                        let symbol = entry.symbol.clone();
                        let selected_symbol = symbol.clone();
                        let is_selected = move || {
                            watchlist.selected.get().as_deref() == Some(selected_symbol.as_str())
                        };
                        let config = SparklineConfig {
                            positive: Some(entry.is_positive()),
                            ..SparklineConfig::mini()
                        };
                        let change_class = if entry.is_positive() { "bull" } else { "bear" };
                        let last = entry.last_close().map(|c| prices.format(c)).unwrap_or_default();
                        let points = watchlist.points_for(symbol.clone());
                        let click_symbol = symbol.clone();

                        view! {
                            <tr
                                class="watchlist-row"
                                class:selected=is_selected
                                on:click=move |_| load_symbol(analysis, watchlist, &click_symbol)
                            >
                                <td class="wl-symbol">
                                    <div>{symbol}</div>
                                    <div class="wl-name">{entry.name.clone()}</div>
                                </td>
                                <td class="wl-spark">
                                    <Sparkline points=points config=config />
                                </td>
                                <td class="wl-last">{last}</td>
                                <td class=format!("wl-change {change_class}")>
                                    {entry.change_label()}
                                </td>
                            </tr>
                        }
                    }
                />
            </tbody>
        </table>
    }
}
