use gloo::timers::future::TimeoutFuture;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::hooks::use_paginated_fetch::RequestGuard;

pub const SEARCH_DEBOUNCE_MS: u32 = 400;

#[derive(Properties, PartialEq)]
pub struct SearchInputProps {
    /// Committed value from the URL, shown when the component mounts.
    pub value: String,
    /// Fires once per quiet window with the final text.
    pub on_search: Callback<String>,
    #[prop_or_default]
    pub placeholder: AttrValue,
}

/// Debounced free-text search box.
///
/// Keystrokes update local draft state immediately; the committed value
/// is emitted only after [`SEARCH_DEBOUNCE_MS`] of quiet, so rapid typing
/// of "a", "ab", "abc" produces a single emit for "abc". Each keystroke
/// issues a new guard generation, stripping earlier pending timers of
/// their right to emit.
#[function_component(SearchInput)]
pub fn search_input(props: &SearchInputProps) -> Html {
    let draft = use_state(|| props.value.clone());
    let guard = use_mut_ref(RequestGuard::default);

    // When the committed value changes from outside (a shared link, a
    // "clear filters" action), the draft follows it and any pending
    // debounce timer loses its right to emit.
    {
        let draft = draft.clone();
        let guard = guard.clone();
        use_effect_with(props.value.clone(), move |value: &String| {
            if *draft != *value {
                guard.borrow().issue();
                draft.set(value.clone());
            }
            || ()
        });
    }

    let oninput = {
        let draft = draft.clone();
        let guard = guard.clone();
        let on_search = props.on_search.clone();

        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let text = input.value();
            draft.set(text.clone());

            let keystroke = guard.borrow().issue();
            let guard = guard.clone();
            let on_search = on_search.clone();
            spawn_local(async move {
                TimeoutFuture::new(SEARCH_DEBOUNCE_MS).await;
                if guard.borrow().is_current(keystroke) {
                    on_search.emit(text);
                }
            });
        })
    };

    html! {
        <input
            type="search"
            class="table-search"
            placeholder={props.placeholder.clone()}
            value={(*draft).clone()}
            {oninput}
        />
    }
}
