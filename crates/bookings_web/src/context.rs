//! Application context shared by all handlers.

use bookings_render::{RenderResult, TemplateRenderer};

use crate::config::AppConfig;
use crate::csrf::CsrfIssuer;
use crate::session::SessionStore;

/// Process-wide state, built before the listener starts and never mutated
/// afterwards.
pub struct AppContext {
    pub config: AppConfig,
    pub renderer: TemplateRenderer<CsrfIssuer>,
    pub sessions: SessionStore,
}

impl AppContext {
    /// Build the context. With caching enabled this compiles every template,
    /// so a broken template directory is reported here.
    pub fn new(config: AppConfig) -> RenderResult<Self> {
        let renderer =
            TemplateRenderer::new(config.render_config(), CsrfIssuer)?.with_site(config.site());
        let sessions = SessionStore::new(config.session_lifetime);

        Ok(Self {
            config,
            renderer,
            sessions,
        })
    }
}
