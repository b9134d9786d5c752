//! Wallet Status Page - Show connected account and contract info

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::state::ico::use_ico_context;

#[component]
pub fn StatusPage() -> impl IntoView {
    let ctx = use_ico_context();
    let navigate = use_navigate();
    let config = ctx.config();

    let on_disconnect = move |_| {
        ctx.disconnect();
        navigate("/", Default::default());
    };

    view! {
        <div class="app-container" style="display: flex; justify-content: center; align-items: center; min-height: calc(100vh - 60px);">
            <div class="card" style="width: 100%; max-width: 500px;">
                <h1 class="card-title" style="text-align: center;">"Wallet Status"</h1>

                <p class="label">"Network"</p>
                <p class="value">{format!("{} (chain {})", config.network_name, config.chain_id)}</p>

                <p class="label">"Token contract"</p>
                <p class="value mono">{config.token_contract.to_string()}</p>

                <p class="label">"NFT contract"</p>
                <p class="value mono">{config.nft_contract.to_string()}</p>

                {move || {
                    let disconnect = on_disconnect.clone();
                    match ctx.account.get() {
                        Some(address) => view! {
                            <div>
                                <p class="label">"Wallet Address"</p>
                                <p class="value mono">{address}</p>
                                <button class="btn" style="width: 100%;" on:click=disconnect>
                                    "Forget Wallet"
                                </button>
                            </div>
                        }
                        .into_any(),
                        None => view! {
                            <div>
                                <p style="text-align: center;">"No wallet connected"</p>
                                <a href="/" class="btn" style="width: 100%; display: block; text-align: center;">
                                    "Connect Wallet"
                                </a>
                            </div>
                        }
                        .into_any(),
                    }
                }}
            </div>
        </div>
    }
}
