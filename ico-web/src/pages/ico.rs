//! ICO Page - mint or claim Crypto Dev tokens

use leptos::prelude::*;

use crate::components::{ActionPanel, ErrorBanner, StatsPanel};
use crate::state::ico::use_ico_context;
use crate::utils::constants::{FOOTER_TEXT, HERO_IMAGE, PAGE_SUBTITLE, PAGE_TITLE};

#[component]
pub fn IcoPage() -> impl IntoView {
    let ctx = use_ico_context();

    view! {
        <div class="content-wrapper">
            <div class="main">
                <div>
                    <h1 class="title">{PAGE_TITLE}</h1>
                    <div class="description">{PAGE_SUBTITLE}</div>
                    <ErrorBanner/>
                    <Show when=move || ctx.connected.get()>
                        <StatsPanel/>
                    </Show>
                    <ActionPanel/>
                </div>
                <div>
                    <img class="image" src=HERO_IMAGE/>
                </div>
            </div>
            <footer class="footer">{FOOTER_TEXT}</footer>
        </div>
    }
}
