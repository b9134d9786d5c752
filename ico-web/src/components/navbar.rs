//! Navigation Bar Component

use leptos::prelude::*;
use leptos_router::components::A;

use crate::state::ico::use_ico_context;

#[component]
pub fn Navbar() -> impl IntoView {
    let ctx = use_ico_context();

    view! {
        <nav>
            <div style="max-width: 1200px; margin: 0 auto; padding: 0 24px; display: flex; justify-content: space-between; align-items: center;">
                <A href="/" attr:class="nav-link-clean">
                    <span class="nav-title">"Crypto Devs"</span>
                </A>
                <A href="/status" attr:class="nav-link-clean">
                    <span class="nav-account">
                        {move || ctx.short_account().unwrap_or_else(|| "Not connected".to_string())}
                    </span>
                </A>
            </div>
        </nav>
    }
}
