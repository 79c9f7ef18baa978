//! # bookings_web
//!
//! Server-rendered booking site.
//!
//! The [`AppContext`] is built once at startup and shared read-only with
//! every handler. It owns the page renderer (and with it the template
//! cache), the session store and the site configuration.
//!
//! Visitors browse the room pages, search availability and fill in a
//! reservation form. A valid reservation is stashed in the visitor's
//! session and shown on the summary page.

pub mod config;
pub mod context;
pub mod csrf;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod session;

pub use config::{AppConfig, Cli};
pub use context::AppContext;
pub use csrf::CsrfIssuer;
pub use models::Reservation;
pub use routes::routes;
pub use session::{Session, SessionStore};
