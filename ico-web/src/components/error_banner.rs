//! Last-error banner

use leptos::prelude::*;
use lib_core::IcoError;

use crate::state::ico::use_ico_context;

#[component]
pub fn ErrorBanner() -> impl IntoView {
    let ctx = use_ico_context();

    move || {
        ctx.error.get().map(|err| {
            let wrong_network = matches!(err, IcoError::WrongNetwork { .. });
            let network_name = ctx.config().network_name;

            view! {
                <div class="error">
                    <p style="text-align: center;">{err.user_message()}</p>
                    <Show when=move || wrong_network>
                        <button class="btn" on:click=move |_| ctx.switch_network()>
                            {format!("Switch to {}", network_name)}
                        </button>
                    </Show>
                    <button class="btn-link" on:click=move |_| ctx.clear_error()>
                        "Dismiss"
                    </button>
                </div>
            }
        })
    }
}
