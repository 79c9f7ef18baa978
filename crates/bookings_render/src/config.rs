//! Render configuration.

use std::collections::HashMap;
use std::path::PathBuf;

/// How layout fragments are composed into page templates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LayoutMode {
    /// Every layout in the template directory is compiled into every page.
    #[default]
    All,
    /// Each page gets only the layouts listed for it, by file name.
    /// Pages missing from the map get no layouts.
    Selective(HashMap<String, Vec<String>>),
}

impl LayoutMode {
    /// Layouts a page may extend, given every layout discovered on disk.
    pub fn layouts_for<'a>(&'a self, page: &str, discovered: &'a [String]) -> Vec<&'a str> {
        match self {
            Self::All => discovered.iter().map(String::as_str).collect(),
            Self::Selective(map) => map
                .get(page)
                .map(|names| names.iter().map(String::as_str).collect())
                .unwrap_or_default(),
        }
    }
}

/// Configuration for template discovery and rendering.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Directory holding `*.page.<ext>` and `*.layout.<ext>` files,
    /// relative to the working directory at build time
    pub template_dir: PathBuf,
    /// Template file extension, without the dot
    pub extension: String,
    /// Reuse the cache built at startup instead of rebuilding per render
    pub use_cache: bool,
    /// Layout composition policy
    pub layout_mode: LayoutMode,
    /// File name suffixes whose output is HTML-escaped
    pub autoescape: Vec<&'static str>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::new("./templates")
    }
}

impl RenderConfig {
    pub fn new(template_dir: impl Into<PathBuf>) -> Self {
        Self {
            template_dir: template_dir.into(),
            extension: "tmpl".to_string(),
            use_cache: true,
            layout_mode: LayoutMode::All,
            autoescape: vec![".tmpl", ".html"],
        }
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn with_cache(mut self, use_cache: bool) -> Self {
        self.use_cache = use_cache;
        self
    }

    pub fn with_layout_mode(mut self, mode: LayoutMode) -> Self {
        self.layout_mode = mode;
        self
    }

    pub fn with_autoescape(mut self, suffixes: Vec<&'static str>) -> Self {
        self.autoescape = suffixes;
        self
    }

    /// Glob matching every page file.
    pub(crate) fn page_glob(&self) -> String {
        self.glob_for("page")
    }

    /// Glob matching every layout file.
    pub(crate) fn layout_glob(&self) -> String {
        self.glob_for("layout")
    }

    fn glob_for(&self, kind: &str) -> String {
        let dir = glob::Pattern::escape(&self.template_dir.to_string_lossy());
        format!("{}/*.{}.{}", dir, kind, self.extension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = RenderConfig::new("site/templates")
            .with_extension("html")
            .with_cache(false);

        assert!(!config.use_cache);
        assert_eq!(config.page_glob(), "site/templates/*.page.html");
        assert_eq!(config.layout_glob(), "site/templates/*.layout.html");
    }

    #[test]
    fn test_glob_escapes_directory() {
        let config = RenderConfig::new("odd[dir]");
        assert_eq!(config.page_glob(), "odd[[]dir[]]/*.page.tmpl");
    }

    #[test]
    fn test_layouts_for() {
        let discovered = vec!["base.layout.tmpl".to_string(), "admin.layout.tmpl".to_string()];

        assert_eq!(LayoutMode::All.layouts_for("home.page.tmpl", &discovered).len(), 2);

        let mut map = HashMap::new();
        map.insert(
            "home.page.tmpl".to_string(),
            vec!["base.layout.tmpl".to_string()],
        );
        let selective = LayoutMode::Selective(map);
        assert_eq!(
            selective.layouts_for("home.page.tmpl", &discovered),
            vec!["base.layout.tmpl"]
        );
        assert!(selective.layouts_for("about.page.tmpl", &discovered).is_empty());
    }
}
