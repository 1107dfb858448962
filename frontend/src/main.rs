mod components;
mod hooks;
mod services;

use yew::prelude::*;

use components::ToursPage;
use services::api::ApiClient;

#[function_component(App)]
fn app() -> Html {
    let api = use_memo((), |_| ApiClient::new());

    html! {
        <>
            <header class="header">
                <div class="container">
                    <h1>{"Roamly"}</h1>
                    <span class="tagline">{"Tours & guides marketplace"}</span>
                </div>
            </header>

            <main class="main">
                <div class="container">
                    <ToursPage api={(*api).clone()} />
                </div>
            </main>
        </>
    }
}

fn main() {
    yew::Renderer::<App>::new().render();
}
