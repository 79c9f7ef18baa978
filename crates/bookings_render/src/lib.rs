//! # bookings_render
//!
//! Template discovery, caching and page rendering for the bookings site.
//!
//! Pages live in a template directory as `*.page.<ext>` files, shared chrome
//! as `*.layout.<ext>` files. The [`CacheBuilder`] compiles every page
//! together with the layouts it may use into one [`CompiledTemplate`], keyed by
//! the page's file name. The [`TemplateRenderer`] resolves a page from the
//! cache (or rebuilds the cache per call when caching is disabled), stamps the
//! per-request anti-forgery token into the [`TemplateData`] and executes the
//! page into a buffer before anything reaches the response.
//!
//! ## Example
//!
//! ```rust,no_run
//! use bookings_render::{RenderConfig, TemplateData, TemplateRenderer};
//!
//! let config = RenderConfig::new("templates").with_cache(true);
//! let issuer = |_request: &str| "token".to_string();
//! let renderer = TemplateRenderer::new(config, issuer).unwrap();
//!
//! let data = TemplateData::new().with_string("name", "World");
//! let mut out = Vec::new();
//! renderer
//!     .render(&mut out, "request", "home.page.tmpl", data)
//!     .unwrap();
//! ```

pub mod cache;
pub mod config;
pub mod data;
pub mod error;
pub mod renderer;
pub mod token;

pub use cache::{CacheBuilder, CompiledTemplate, TemplateCache};
pub use config::{LayoutMode, RenderConfig};
pub use data::{SiteContext, TemplateData};
pub use error::{RenderError, RenderResult};
pub use renderer::TemplateRenderer;
pub use token::TokenIssuer;
