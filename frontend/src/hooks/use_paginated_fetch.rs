use shared::{ApiError, PageMeta};
use std::cell::Cell;
use std::future::Future;
use std::pin::Pin;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::hooks::use_table_query::TableQueryState;
use crate::services::logging::Logger;

pub type PageFuture<T> = Pin<Box<dyn Future<Output = Result<(Vec<T>, Option<PageMeta>), ApiError>>>>;

/// Where table pages come from. The production implementation is the
/// REST client in `services::api`; tests plug in scripted sources with
/// controlled timing.
pub trait PageSource<T> {
    fn fetch(&self, resource: &str, query: &TableQueryState) -> PageFuture<T>;
}

/// Output of the fetcher for one table instance. Recomputed on every
/// query change; rows are never merged across pages.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchResult<T> {
    pub rows: Vec<T>,
    pub meta: Option<PageMeta>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Monotonic generation counter enforcing the single-flight discipline:
/// issuing a new generation strips every earlier one of its right to
/// apply a result. Owned by exactly one hook instance.
#[derive(Debug, Default)]
pub struct RequestGuard {
    current: Cell<u64>,
}

impl RequestGuard {
    pub fn issue(&self) -> u64 {
        let next = self.current.get() + 1;
        self.current.set(next);
        next
    }

    pub fn is_current(&self, id: u64) -> bool {
        self.current.get() == id
    }
}

/// Keep exactly one request in flight for `resource` + `query`.
///
/// Every change to the resource path or any query field cancels the
/// previous request's right to update state; a slow stale response
/// arriving after a newer one is dropped silently. On failure the
/// previous rows and meta stay visible and only `error` is set.
#[hook]
pub fn use_paginated_fetch<T, S>(
    source: &S,
    resource: &str,
    query: &TableQueryState,
) -> FetchResult<T>
where
    T: Clone + PartialEq + 'static,
    S: PageSource<T> + Clone + 'static,
{
    let rows = use_state(Vec::<T>::new);
    let meta = use_state(|| Option::<PageMeta>::None);
    let loading = use_state(|| true);
    let error = use_state(|| Option::<String>::None);
    let guard = use_mut_ref(RequestGuard::default);

    {
        let source = source.clone();
        let rows = rows.clone();
        let meta = meta.clone();
        let loading = loading.clone();
        let error = error.clone();
        let guard = guard.clone();

        use_effect_with(
            (resource.to_string(), query.clone()),
            move |(resource, query): &(String, TableQueryState)| {
                let request_id = guard.borrow().issue();
                let future = source.fetch(resource, query);
                let resource = resource.clone();
                let query = query.clone();
                loading.set(true);

                spawn_local(async move {
                    let outcome = future.await;

                    if !guard.borrow().is_current(request_id) {
                        Logger::debug_with_component(
                            "paginated-fetch",
                            &format!("Dropping superseded response for {}", resource),
                        );
                        return;
                    }

                    match outcome {
                        Ok((data, page_meta)) => {
                            let page_meta = page_meta.unwrap_or_else(|| {
                                PageMeta::synthesized(query.page, query.limit, data.len())
                            });
                            Logger::info_with_component(
                                "paginated-fetch",
                                &format!("Loaded {} rows from {}", data.len(), resource),
                            );
                            rows.set(data);
                            meta.set(Some(page_meta));
                            error.set(None);
                        }
                        Err(err) => {
                            // Previous rows stay visible; only the error
                            // banner changes.
                            Logger::error_with_component(
                                "paginated-fetch",
                                &format!("{} failed: {}", resource, err),
                            );
                            error.set(Some(err.to_string()));
                        }
                    }

                    loading.set(false);
                });

                || ()
            },
        );
    }

    FetchResult {
        rows: (*rows).clone(),
        meta: (*meta).clone(),
        loading: *loading,
        error: (*error).clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::use_table_query::TableQueryConfig;
    use gloo::timers::future::TimeoutFuture;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_new_generation_supersedes_older_ones() {
        let guard = RequestGuard::default();
        let first = guard.issue();
        assert!(guard.is_current(first));

        let second = guard.issue();
        assert!(!guard.is_current(first));
        assert!(guard.is_current(second));
    }

    #[derive(Clone, PartialEq)]
    struct RowStub {
        label: String,
    }

    // Page 1 answers slowly, every later page quickly, so a stale
    // response always lands after its successor.
    #[derive(Clone, PartialEq)]
    struct RacingSource;

    impl PageSource<RowStub> for RacingSource {
        fn fetch(&self, _resource: &str, query: &TableQueryState) -> PageFuture<RowStub> {
            let page = query.page;
            Box::pin(async move {
                let delay = if page == 1 { 60 } else { 10 };
                TimeoutFuture::new(delay).await;
                Ok((
                    vec![RowStub {
                        label: format!("page-{}", page),
                    }],
                    None,
                ))
            })
        }
    }

    // Page 1 succeeds, every later page fails.
    #[derive(Clone, PartialEq)]
    struct FailingSecondPageSource;

    impl PageSource<RowStub> for FailingSecondPageSource {
        fn fetch(&self, _resource: &str, query: &TableQueryState) -> PageFuture<RowStub> {
            let page = query.page;
            Box::pin(async move {
                TimeoutFuture::new(5).await;
                if page == 1 {
                    Ok((
                        vec![RowStub {
                            label: "page-1".to_string(),
                        }],
                        None,
                    ))
                } else {
                    Err(ApiError::Http {
                        status: 500,
                        body: "backend unavailable".to_string(),
                    })
                }
            })
        }
    }

    fn render_output(result: &FetchResult<RowStub>) -> Html {
        let labels = result
            .rows
            .iter()
            .map(|row| row.label.clone())
            .collect::<Vec<_>>()
            .join(",");
        html! {
            <div>
                <span class="row-labels">{ labels }</span>
                <span class="load-flag">{ if result.loading { "loading" } else { "settled" } }</span>
                <span class="error-text">{ result.error.clone().unwrap_or_default() }</span>
            </div>
        }
    }

    // Both fixtures mount on page 1, then move to page 2 after a delay,
    // rendering whatever the hook reports.
    #[function_component(RaceFixture)]
    fn race_fixture() -> Html {
        let page = use_state(|| 1u32);
        {
            let page = page.clone();
            use_effect_with((), move |_| {
                spawn_local(async move {
                    TimeoutFuture::new(5).await;
                    page.set(2);
                });
                || ()
            });
        }
        let query = TableQueryState::new(&TableQueryConfig::default()).with_page(*page);
        let result = use_paginated_fetch::<RowStub, RacingSource>(&RacingSource, "/api/rows", &query);
        render_output(&result)
    }

    #[function_component(ErrorFixture)]
    fn error_fixture() -> Html {
        let page = use_state(|| 1u32);
        {
            let page = page.clone();
            use_effect_with((), move |_| {
                spawn_local(async move {
                    TimeoutFuture::new(40).await;
                    page.set(2);
                });
                || ()
            });
        }
        let query = TableQueryState::new(&TableQueryConfig::default()).with_page(*page);
        let result = use_paginated_fetch::<RowStub, FailingSecondPageSource>(
            &FailingSecondPageSource,
            "/api/rows",
            &query,
        );
        render_output(&result)
    }

    async fn mount<C>() -> web_sys::Element
    where
        C: yew::BaseComponent,
        C::Properties: Default,
    {
        let document = web_sys::window().unwrap().document().unwrap();
        let host = document.create_element("div").unwrap();
        document.body().unwrap().append_child(&host).unwrap();
        yew::Renderer::<C>::with_root(host.clone()).render();
        TimeoutFuture::new(20).await;
        host
    }

    // Page-1 request started first but resolving last must not overwrite
    // page-2's rows.
    #[wasm_bindgen_test]
    async fn test_out_of_order_responses_apply_latest_only() {
        let host = mount::<RaceFixture>().await;
        TimeoutFuture::new(150).await;

        let markup = host.inner_html();
        assert!(markup.contains("page-2"));
        assert!(!markup.contains("page-1"));
        assert!(markup.contains("settled"));
    }

    #[wasm_bindgen_test]
    async fn test_failed_fetch_keeps_previous_rows_visible() {
        let host = mount::<ErrorFixture>().await;
        TimeoutFuture::new(150).await;

        let markup = host.inner_html();
        assert!(markup.contains("page-1"));
        assert!(markup.contains("Server error 500"));
        assert!(markup.contains("settled"));
    }
}
