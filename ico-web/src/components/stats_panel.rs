//! Minted-token summary shown while connected

use leptos::prelude::*;

use crate::state::ico::use_ico_context;

#[component]
pub fn StatsPanel() -> impl IntoView {
    let ctx = use_ico_context();

    view! {
        <div>
            <div class="description">{move || ctx.summary().minted_line()}</div>
            <div class="description">{move || ctx.summary().overall_line()}</div>
        </div>
    }
}
