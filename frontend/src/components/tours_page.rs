use shared::{TourStatus, TourSummary};
use web_sys::HtmlSelectElement;
use yew::prelude::*;

use crate::components::data_table::{Column, DataTable};
use crate::components::search_input::SearchInput;
use crate::hooks::use_paginated_fetch::use_paginated_fetch;
use crate::hooks::use_table_query::{use_table_query, TableQueryConfig};
use crate::services::api::ApiClient;

const TOUR_FILTER_KEYS: &[&str] = &["status", "destination"];
const STATUS_OPTIONS: [TourStatus; 3] =
    [TourStatus::Active, TourStatus::Draft, TourStatus::Blocked];

#[derive(Properties, PartialEq)]
pub struct ToursPageProps {
    pub api: ApiClient,
}

/// Admin tours listing: the concrete screen wiring query state, fetcher
/// and table renderer together.
#[function_component(ToursPage)]
pub fn tours_page(props: &ToursPageProps) -> Html {
    let table = use_table_query(TableQueryConfig {
        filter_keys: TOUR_FILTER_KEYS,
        default_page_size: 10,
    });
    let result =
        use_paginated_fetch::<TourSummary, ApiClient>(&props.api, "/api/tours", &table.state);

    let columns = use_memo((), |_| tour_columns());

    let on_status_change = {
        let set_filter = table.set_filter.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            let value = select.value();
            let value = if value.is_empty() { None } else { Some(value) };
            set_filter.emit(("status".to_string(), value));
        })
    };

    let active_status = table.state.filters.get("status").cloned();
    let toolbar = html! {
        <>
            <SearchInput
                value={table.state.search.clone()}
                on_search={table.set_search.clone()}
                placeholder="Search tours"
            />
            <select class="status-filter" onchange={on_status_change}>
                <option value="" selected={active_status.is_none()}>{"All statuses"}</option>
                { for STATUS_OPTIONS.iter().map(|status| {
                    let selected = active_status.as_deref() == Some(status.as_param());
                    html! {
                        <option value={status.as_param()} {selected}>
                            { status.label() }
                        </option>
                    }
                })}
            </select>
        </>
    };

    html! {
        <section class="tours-section">
            <h2>{"Tours"}</h2>
            <DataTable<TourSummary>
                columns={(*columns).clone()}
                rows={result.rows.clone()}
                meta={result.meta.clone()}
                loading={result.loading}
                error={result.error.clone()}
                page={table.state.page}
                limit={table.state.limit}
                sort={table.state.sort.clone()}
                on_page_change={table.set_page.clone()}
                on_page_size_change={table.set_page_size.clone()}
                on_sort_change={Some(table.cycle_sort.clone())}
                toolbar={toolbar}
            />
        </section>
    }
}

fn tour_columns() -> Vec<Column<TourSummary>> {
    vec![
        Column::new("Title", |tour: &TourSummary| {
            html! { <span class="tour-title">{ &tour.title }</span> }
        })
        .sortable("title"),
        Column::new("Destination", |tour: &TourSummary| {
            html! { { &tour.destination } }
        }),
        Column::new("Price", |tour: &TourSummary| {
            html! { { format!("${:.2}", tour.price) } }
        })
        .sortable("price"),
        Column::new("Rating", |tour: &TourSummary| {
            if tour.rating > 0.0 {
                html! { { format!("{:.1}", tour.rating) } }
            } else {
                html! { <span class="muted">{"No reviews"}</span> }
            }
        }),
        Column::new("Next departure", |tour: &TourSummary| {
            match tour.next_departure {
                Some(date) => html! { { date.format("%b %d, %Y").to_string() } },
                None => html! { <span class="muted">{"Not scheduled"}</span> },
            }
        }),
        Column::new("Status", |tour: &TourSummary| {
            let class = match tour.status {
                TourStatus::Active => "status active",
                TourStatus::Draft => "status draft",
                TourStatus::Blocked => "status blocked",
            };
            html! { <span class={class}>{ tour.status.label() }</span> }
        }),
    ]
}
