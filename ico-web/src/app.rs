//! Crypto Devs ICO Web App - Leptos Frontend

use leptos::prelude::*;
use leptos_router::{
    components::{Route, Router, Routes, A},
    path,
};
use lib_core::config::core_config;

use crate::components::Navbar;
use crate::pages::{IcoPage, StatusPage};
use crate::state::ico::provide_ico_context;

#[component]
pub fn App() -> impl IntoView {
    provide_ico_context(core_config().clone());

    view! {
        <Router>
            <div class="app-container">
                <Navbar/>
                <Routes fallback=|| view! { <NotFound/> }>
                    <Route path=path!("/") view=IcoPage/>
                    <Route path=path!("/status") view=StatusPage/>
                </Routes>
            </div>
        </Router>
    }
}

/// Shown instead of the app when the build was configured without valid contracts.
#[component]
pub fn ConfigError(message: String) -> impl IntoView {
    view! {
        <div class="app-container" style="display: flex; justify-content: center; align-items: center; min-height: 100vh;">
            <div class="card" style="max-width: 500px; text-align: center;">
                <h1 style="margin-bottom: 16px;">"Configuration error"</h1>
                <p class="error">{message}</p>
            </div>
        </div>
    }
}

#[component]
fn NotFound() -> impl IntoView {
    view! {
        <div class="app-container" style="display: flex; justify-content: center; align-items: center; min-height: calc(100vh - 60px);">
            <div class="card" style="max-width: 500px; text-align: center;">
                <h1 style="margin-bottom: 16px; font-size: 32px; font-weight: 700;">"404 - Page Not Found"</h1>
                <p style="margin-bottom: 24px;">"The page you're looking for doesn't exist."</p>
                <A href="/">
                    <span class="btn" style="margin-top: 20px; display: inline-block;">
                        "Back to the ICO"
                    </span>
                </A>
            </div>
        </div>
    }
}
