use shared::{PageMeta, SortOrder};
use std::rc::Rc;
use web_sys::HtmlSelectElement;
use yew::prelude::*;

/// Allowed entries of the page-size selector.
pub const PAGE_SIZE_OPTIONS: [u32; 3] = [10, 20, 50];

/// Cell renderer behind an `Rc` so column definitions stay cheap to
/// clone. Equality is pointer identity, which is what prop diffing needs.
pub struct CellRender<T>(Rc<dyn Fn(&T) -> Html>);

impl<T> CellRender<T> {
    pub fn new(render: impl Fn(&T) -> Html + 'static) -> Self {
        Self(Rc::new(render))
    }

    pub fn render(&self, row: &T) -> Html {
        (self.0)(row)
    }
}

impl<T> Clone for CellRender<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T> PartialEq for CellRender<T> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// One column of the table: header label, optional sort key, cell body.
#[derive(Clone, PartialEq)]
pub struct Column<T> {
    pub label: String,
    /// Key sent as `sortBy` when the header is clicked; `None` renders a
    /// plain, non-clickable header cell.
    pub sort_key: Option<String>,
    pub render: CellRender<T>,
}

impl<T> Column<T> {
    pub fn new(label: impl Into<String>, render: impl Fn(&T) -> Html + 'static) -> Self {
        Self {
            label: label.into(),
            sort_key: None,
            render: CellRender::new(render),
        }
    }

    pub fn sortable(mut self, key: impl Into<String>) -> Self {
        self.sort_key = Some(key.into());
        self
    }
}

#[derive(Properties, PartialEq)]
pub struct DataTableProps<T: Clone + PartialEq + 'static> {
    pub columns: Vec<Column<T>>,
    pub rows: Vec<T>,
    pub meta: Option<PageMeta>,
    pub loading: bool,
    #[prop_or_default]
    pub error: Option<String>,
    /// Current 1-based page, mirrored from the query state.
    pub page: u32,
    pub limit: u32,
    #[prop_or_default]
    pub sort: Option<(String, SortOrder)>,
    pub on_page_change: Callback<u32>,
    pub on_page_size_change: Callback<u32>,
    /// Emits the clicked column's sort key; the query state applies the
    /// asc/desc/none cycle.
    #[prop_or_default]
    pub on_sort_change: Option<Callback<String>>,
    /// Caller-injected search/filter widgets; the table only forwards
    /// their changes, it knows nothing about their semantics.
    #[prop_or_default]
    pub toolbar: Html,
}

/// Stateless table renderer: header with sort indicators, skeleton or
/// empty-state body, pagination footer. All state lives in the URL and
/// the fetch result, so it can be tested with a fixed snapshot.
#[function_component(DataTable)]
pub fn data_table<T>(props: &DataTableProps<T>) -> Html
where
    T: Clone + PartialEq + 'static,
{
    let page_count = props
        .meta
        .as_ref()
        .map(PageMeta::page_count)
        .unwrap_or(1);

    let header = html! {
        <tr>
            { for props.columns.iter().map(|column| {
                let indicator = sort_indicator(props.sort.as_ref(), column.sort_key.as_deref());
                match (&column.sort_key, &props.on_sort_change) {
                    (Some(key), Some(on_sort)) => {
                        let key = key.clone();
                        let on_sort = on_sort.clone();
                        let onclick = Callback::from(move |_: MouseEvent| on_sort.emit(key.clone()));
                        html! {
                            <th class="sortable" {onclick}>
                                { &column.label }{ indicator }
                            </th>
                        }
                    }
                    _ => html! { <th>{ &column.label }</th> },
                }
            })}
        </tr>
    };

    let body = if props.loading {
        // Skeleton keeps the layout height stable while fetching,
        // whatever the previous row count was.
        html! {
            { for (0..props.limit).map(|_| html! {
                <tr class="skeleton-row">
                    { for props.columns.iter().map(|_| html! {
                        <td><div class="skeleton-cell"></div></td>
                    })}
                </tr>
            })}
        }
    } else if props.rows.is_empty() {
        html! {
            <tr class="empty-row">
                <td colspan={props.columns.len().to_string()}>{"No results"}</td>
            </tr>
        }
    } else {
        html! {
            { for props.rows.iter().map(|row| html! {
                <tr>
                    { for props.columns.iter().map(|column| html! {
                        <td>{ column.render.render(row) }</td>
                    })}
                </tr>
            })}
        }
    };

    let on_page_size = {
        let on_page_size_change = props.on_page_size_change.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            if let Ok(limit) = select.value().parse::<u32>() {
                on_page_size_change.emit(limit);
            }
        })
    };

    let on_prev = {
        let on_page_change = props.on_page_change.clone();
        let page = props.page;
        Callback::from(move |_: MouseEvent| on_page_change.emit(page.saturating_sub(1).max(1)))
    };

    let on_next = {
        let on_page_change = props.on_page_change.clone();
        let page = props.page;
        Callback::from(move |_: MouseEvent| on_page_change.emit(page + 1))
    };

    html! {
        <div class="data-table">
            <div class="table-toolbar">
                { props.toolbar.clone() }
            </div>

            { if let Some(error) = &props.error {
                html! { <div class="table-error">{ error }</div> }
            } else {
                html! {}
            }}

            <div class="table-container">
                <table>
                    <thead>{ header }</thead>
                    <tbody>{ body }</tbody>
                </table>
            </div>

            <div class="table-footer">
                <label class="page-size">
                    {"Rows per page"}
                    <select value={props.limit.to_string()} onchange={on_page_size}>
                        { for PAGE_SIZE_OPTIONS.iter().map(|size| html! {
                            <option value={size.to_string()} selected={*size == props.limit}>
                                { size.to_string() }
                            </option>
                        })}
                    </select>
                </label>

                <div class="pager">
                    <button onclick={on_prev} disabled={props.page <= 1}>{"Previous"}</button>
                    <span class="page-label">
                        { format!("Page {} of {}", props.page, page_count) }
                    </span>
                    <button onclick={on_next} disabled={props.page >= page_count}>{"Next"}</button>
                </div>
            </div>
        </div>
    }
}

fn sort_indicator(sort: Option<&(String, SortOrder)>, key: Option<&str>) -> &'static str {
    match (sort, key) {
        (Some((active, order)), Some(key)) if active == key => match order {
            SortOrder::Asc => " ▲",
            SortOrder::Desc => " ▼",
        },
        _ => "",
    }
}
