//! Command line and environment configuration.

use std::path::PathBuf;

use bookings_render::{RenderConfig, SiteContext};
use chrono::Duration;
use clap::Parser;

/// Fort Smythe bookings - server-rendered reservation site
#[derive(Parser, Debug, Clone)]
#[command(name = "bookings")]
#[command(version, about = "Server-rendered booking site")]
pub struct Cli {
    /// Port to listen on
    #[arg(short, long, env = "BOOKINGS_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Directory holding *.page.tmpl and *.layout.tmpl files
    #[arg(long, env = "BOOKINGS_TEMPLATES", default_value = "./templates")]
    pub templates: PathBuf,

    /// Directory served under /static
    #[arg(long = "static", env = "BOOKINGS_STATIC", default_value = "./static")]
    pub static_dir: PathBuf,

    /// Rebuild templates on every request (development)
    #[arg(long, env = "BOOKINGS_NO_CACHE")]
    pub no_cache: bool,

    /// Production mode: session cookies are marked Secure
    #[arg(long, env = "BOOKINGS_IN_PRODUCTION")]
    pub in_production: bool,

    /// Site name shown in page chrome
    #[arg(long, env = "BOOKINGS_SITE_NAME", default_value = "Fort Smythe Bed and Breakfast")]
    pub site_name: String,
}

/// Process-wide settings, fixed at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub template_dir: PathBuf,
    pub static_dir: PathBuf,
    pub use_cache: bool,
    pub in_production: bool,
    pub site_name: String,
    pub session_lifetime: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            template_dir: PathBuf::from("./templates"),
            static_dir: PathBuf::from("./static"),
            use_cache: true,
            in_production: false,
            site_name: "Fort Smythe Bed and Breakfast".to_string(),
            session_lifetime: Duration::hours(24),
        }
    }
}

impl From<Cli> for AppConfig {
    fn from(cli: Cli) -> Self {
        Self {
            port: cli.port,
            template_dir: cli.templates,
            static_dir: cli.static_dir,
            use_cache: !cli.no_cache,
            in_production: cli.in_production,
            site_name: cli.site_name,
            ..Self::default()
        }
    }
}

impl AppConfig {
    pub fn with_template_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.template_dir = dir.into();
        self
    }

    pub fn with_cache(mut self, use_cache: bool) -> Self {
        self.use_cache = use_cache;
        self
    }

    pub fn render_config(&self) -> RenderConfig {
        RenderConfig::new(&self.template_dir).with_cache(self.use_cache)
    }

    pub fn site(&self) -> SiteContext {
        SiteContext::new(&self.site_name, self.in_production)
    }
}
