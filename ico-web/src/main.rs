//! Crypto Devs ICO dApp
//!
//! Browser frontend: connects an injected Ethereum wallet, shows the caller's
//! Crypto Dev Token position and lets them mint or claim.

use leptos::prelude::*;
use lib_core::config::{init_config, IcoConfig};
use lib_core::IcoError;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

mod app;
mod components;
mod pages;
mod services;
mod state;
mod utils;

use app::{App, ConfigError};

#[wasm_bindgen(start)]
pub fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    // Initialize logger
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("Crypto Devs ICO starting...");

    hide_loading_screen();

    match load_config() {
        Ok(()) => leptos::mount::mount_to_body(|| view! { <App/> }),
        Err(err) => {
            log::error!("{}", err);
            let message = err.to_string();
            leptos::mount::mount_to_body(move || view! { <ConfigError message=message.clone()/> })
        }
    }
}

/// Load the configuration baked in at build time and install it globally.
fn load_config() -> Result<(), IcoError> {
    let config = IcoConfig::from_build_env().map_err(IcoError::Config)?;
    init_config(config).map_err(IcoError::Config)
}

/// Hide the loading screen element
fn hide_loading_screen() {
    let Some(document) = web_sys::window().and_then(|window| window.document()) else {
        log::warn!("No document available");
        return;
    };

    match document.get_element_by_id("leptos-loading") {
        Some(loading_element) => {
            if let Some(html_element) = loading_element.dyn_ref::<HtmlElement>() {
                html_element.class_list().add_1("hidden").ok();
            }
            loading_element
                .set_attribute("style", "display: none !important;")
                .ok();
        }
        None => log::warn!("Loading element not found"),
    }
}
