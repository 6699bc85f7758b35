//! Interactive behaviour for the marketing pages: navigation menu, cookie
//! banner, scroll tracking, count-up figures, connectivity notices and the
//! contact and poll forms.
//!
//! [`PageController`] holds all of it. Hosts feed it DOM events and clock
//! readings; the browser host lives in `web` (wasm32 only), the headless
//! host in [`dom::memory`].

pub mod config;
pub mod consent;
pub mod controller;
pub mod counter;
pub mod dom;
pub mod elements;
pub mod events;
pub mod forms;
pub mod menu;
pub mod scheduler;
pub mod scroll;
pub mod state;
pub mod components {
    pub mod notification;
}
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use controller::PageController;
