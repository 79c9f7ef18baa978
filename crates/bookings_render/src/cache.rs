//! Template discovery and compilation.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tera::{Context, Tera};
use tracing::{debug, info, warn};

use crate::config::RenderConfig;
use crate::error::{RenderError, RenderResult};

/// One page compiled together with the layouts it may extend.
///
/// Immutable once built; executing it only reads the compiled templates.
#[derive(Debug)]
pub struct CompiledTemplate {
    name: String,
    tera: Tera,
}

impl CompiledTemplate {
    /// File name of the page this unit renders.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Names of the layout fragments compiled into this unit.
    pub fn layouts(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .tera
            .get_template_names()
            .filter(|n| *n != self.name)
            .collect();
        names.sort_unstable();
        names
    }

    pub(crate) fn execute(&self, context: &Context) -> tera::Result<String> {
        self.tera.render(&self.name, context)
    }
}

/// Compiled page templates keyed by page file name.
#[derive(Debug, Default)]
pub struct TemplateCache {
    pages: HashMap<String, CompiledTemplate>,
}

impl TemplateCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, template: CompiledTemplate) {
        self.pages.insert(template.name.clone(), template);
    }

    pub fn get(&self, page: &str) -> Option<&CompiledTemplate> {
        self.pages.get(page)
    }

    pub fn contains(&self, page: &str) -> bool {
        self.pages.contains_key(page)
    }

    /// Page names, sorted.
    pub fn page_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.pages.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// Scans the template directory and compiles every page.
pub struct CacheBuilder<'a> {
    config: &'a RenderConfig,
}

impl<'a> CacheBuilder<'a> {
    pub fn new(config: &'a RenderConfig) -> Self {
        Self { config }
    }

    /// Build a fresh cache. Any listing, read or parse failure aborts the
    /// whole build; no partial cache is returned.
    pub fn build(&self) -> RenderResult<TemplateCache> {
        let dir = &self.config.template_dir;
        if !dir.is_dir() {
            return Err(RenderError::TemplateDirMissing(dir.clone()));
        }

        let pages = discover(&self.config.page_glob())?;
        if pages.is_empty() {
            warn!("No page templates found in {:?}", dir);
        }

        let layouts = discover(&self.config.layout_glob())?
            .iter()
            .map(|path| read_source(path))
            .collect::<RenderResult<Vec<_>>>()?;
        let layout_names: Vec<String> = layouts.iter().map(|(name, _)| name.clone()).collect();
        check_layouts(&layouts)?;

        let mut cache = TemplateCache::new();
        for page in &pages {
            let (name, source) = read_source(page)?;
            let compiled = self.compile(name, &source, &layouts, &layout_names)?;
            cache.insert(compiled);
        }

        info!(
            "Built template cache: {} pages, {} layouts from {:?}",
            cache.len(),
            layouts.len(),
            dir
        );
        Ok(cache)
    }

    fn compile(
        &self,
        name: String,
        source: &str,
        layouts: &[(String, String)],
        layout_names: &[String],
    ) -> RenderResult<CompiledTemplate> {
        let mut sources: Vec<(&str, &str)> = Vec::new();
        for layout in self.config.layout_mode.layouts_for(&name, layout_names) {
            let (layout_name, layout_source) = layouts
                .iter()
                .find(|(n, _)| n == layout)
                .ok_or_else(|| RenderError::UnknownLayout {
                    page: name.clone(),
                    layout: layout.to_string(),
                })?;
            sources.push((layout_name.as_str(), layout_source.as_str()));
        }
        sources.push((name.as_str(), source));

        let mut tera = Tera::default();
        tera.autoescape_on(self.config.autoescape.clone());
        // Added in one batch so inheritance is resolved once every parent is present.
        tera.add_raw_templates(sources)
            .map_err(|source| RenderError::Parse {
                template: name.clone(),
                source,
            })?;

        debug!("Compiled {} with {} layouts", name, tera.get_template_names().count() - 1);
        Ok(CompiledTemplate { name, tera })
    }
}

/// Parse every layout once, whether or not a page selects it. Each layout is
/// parsed alone first so a syntax error is reported against its own file,
/// then all together so layouts extending other layouts are resolved.
fn check_layouts(layouts: &[(String, String)]) -> RenderResult<()> {
    for (name, source) in layouts {
        let mut scratch = Tera::default();
        if let Err(e) = scratch.add_raw_template(name, source) {
            // Parents are only present in the combined pass below.
            if !matches!(e.kind, tera::ErrorKind::MissingParent { .. }) {
                return Err(RenderError::Parse {
                    template: name.clone(),
                    source: e,
                });
            }
        }
    }

    let mut combined = Tera::default();
    combined
        .add_raw_templates(layouts.iter().map(|(n, s)| (n.as_str(), s.as_str())))
        .map_err(|source| {
            let template = match &source.kind {
                tera::ErrorKind::MissingParent { current, .. } => current.clone(),
                _ => layouts
                    .iter()
                    .map(|(n, _)| n.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            };
            RenderError::Parse { template, source }
        })?;

    debug!("Checked {} layouts", layouts.len());
    Ok(())
}

/// Files matching a glob, in a stable order.
fn discover(pattern: &str) -> RenderResult<Vec<PathBuf>> {
    let mut paths = glob::glob(pattern)?.collect::<Result<Vec<_>, _>>()?;
    paths.sort();
    Ok(paths)
}

fn read_source(path: &Path) -> RenderResult<(String, String)> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned());
    debug!("Reading template {:?}", path);
    let source = fs::read_to_string(path)?;
    Ok((name, source))
}
