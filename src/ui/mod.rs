//! Ratatui front-end: a navigation shell hosting one screen per table, a
//! footer with toasts and key hints, and the crossterm event loop.

mod app;
mod forms;
mod helpers;
mod notify;
mod routes;
mod terminal;
mod views;

pub use app::App;
pub use notify::{Notifications, Toast, ToastKind};
pub use routes::Route;
pub use terminal::run_app;
