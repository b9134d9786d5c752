//! Connect / loading / claim / mint action area

use leptos::prelude::*;
use lib_core::view::{mint_input_value, parse_mint_amount, IcoView};

use crate::state::ico::{use_ico_context, IcoContext};
use crate::utils::constants::{INSTALL_WALLET_URL, MINT_PLACEHOLDER};

#[component]
pub fn ActionPanel() -> impl IntoView {
    let ctx = use_ico_context();

    // Rebuild the markup only when the kind of view changes, so typing in the
    // mint input does not recreate it.
    let kind = Memo::new(move |_| ctx.view_kind());

    move || {
        kind.track();
        match untrack(move || ctx.view()) {
            IcoView::Disconnected => disconnected(ctx).into_any(),
            IcoView::Loading => view! {
                <div>
                    <button class="btn" disabled=true>"Loading..."</button>
                </div>
            }
            .into_any(),
            IcoView::Claim { .. } => view! {
                <div>
                    <div class="description">
                        {move || match ctx.view() {
                            IcoView::Claim { claimable_tokens, .. } => {
                                format!("{} Tokens can be claimed!", claimable_tokens)
                            }
                            _ => String::new(),
                        }}
                    </div>
                    <button class="btn" on:click=move |_| ctx.claim()>"Claim Tokens"</button>
                </div>
            }
            .into_any(),
            IcoView::Mint { .. } => view! {
                <div style="display: flex; flex-direction: column; gap: 12px;">
                    <input
                        type="number"
                        min="1"
                        class="input"
                        placeholder=MINT_PLACEHOLDER
                        prop:value=mint_input_value(ctx.mint_amount.get_untracked())
                        on:input=move |ev| ctx.mint_amount.set(parse_mint_amount(&event_target_value(&ev)))
                    />
                    <button
                        class="btn"
                        disabled=move || !matches!(ctx.view(), IcoView::Mint { can_submit: true })
                        on:click=move |_| ctx.mint()
                    >
                        "Mint Tokens"
                    </button>
                </div>
            }
            .into_any(),
        }
    }
}

fn disconnected(ctx: IcoContext) -> impl IntoView {
    if ctx.wallet_installed {
        view! {
            <button class="btn" on:click=move |_| ctx.connect()>"Connect your wallet"</button>
        }
        .into_any()
    } else {
        view! {
            <div class="info">
                <p style="text-align: center;">"No Ethereum wallet detected."</p>
                <a href=INSTALL_WALLET_URL target="_blank" class="btn">"Install MetaMask"</a>
            </div>
        }
        .into_any()
    }
}
