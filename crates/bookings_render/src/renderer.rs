//! Page rendering against the template cache.

use std::io::Write;

use tera::Context;
use tracing::{debug, error};

use crate::cache::{CacheBuilder, TemplateCache};
use crate::config::RenderConfig;
use crate::data::{SiteContext, TemplateData};
use crate::error::{RenderError, RenderResult};
use crate::token::TokenIssuer;

/// Renders named pages for request handlers.
///
/// The renderer owns the cache built at startup. With caching disabled the
/// cache is rebuilt from disk on every call, isolated to that call.
pub struct TemplateRenderer<I> {
    config: RenderConfig,
    cache: Option<TemplateCache>,
    issuer: I,
    site: Option<SiteContext>,
}

impl<I> TemplateRenderer<I> {
    /// Create a renderer. With caching enabled the cache is built here, so a
    /// broken template directory fails startup rather than a request.
    pub fn new(config: RenderConfig, issuer: I) -> RenderResult<Self> {
        let cache = if config.use_cache {
            Some(CacheBuilder::new(&config).build()?)
        } else {
            None
        };

        Ok(Self {
            config,
            cache,
            issuer,
            site: None,
        })
    }

    /// Create a renderer around an already built cache.
    pub fn with_cache(config: RenderConfig, cache: TemplateCache, issuer: I) -> Self {
        Self {
            config,
            cache: Some(cache),
            issuer,
            site: None,
        }
    }

    /// Site-wide context stamped into every page.
    pub fn with_site(mut self, site: SiteContext) -> Self {
        self.site = Some(site);
        self
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn cache(&self) -> Option<&TemplateCache> {
        self.cache.as_ref()
    }

    /// Render `page` against `data` and write the result to `out`.
    ///
    /// Output is produced in full before the first byte is written, so a
    /// failing page leaves `out` untouched.
    pub fn render<R, W>(
        &self,
        out: &mut W,
        request: &R,
        page: &str,
        data: TemplateData,
    ) -> RenderResult<()>
    where
        R: ?Sized,
        W: Write + ?Sized,
        I: TokenIssuer<R>,
    {
        let rebuilt;
        let cache = match &self.cache {
            Some(cache) if self.config.use_cache => cache,
            _ => {
                rebuilt = CacheBuilder::new(&self.config).build().map_err(|e| {
                    error!("Failed to rebuild template cache for {}: {}", page, e);
                    e
                })?;
                &rebuilt
            }
        };

        let template = cache.get(page).ok_or_else(|| {
            error!("Could not get {} from template cache", page);
            RenderError::NotFound(page.to_string())
        })?;

        let data = self.add_default_data(data, request);

        let buf = Context::from_serialize(&data)
            .and_then(|context| template.execute(&context))
            .map_err(|source| {
                let err = RenderError::Execution {
                    page: page.to_string(),
                    source,
                };
                error!("{}", err);
                err
            })?;

        out.write_all(buf.as_bytes()).map_err(|e| {
            error!("Failed to write {}: {}", page, e);
            e
        })?;

        debug!("Rendered {} ({} bytes)", page, buf.len());
        Ok(())
    }

    /// Render `page` into a new buffer.
    pub fn render_to_vec<R>(
        &self,
        request: &R,
        page: &str,
        data: TemplateData,
    ) -> RenderResult<Vec<u8>>
    where
        R: ?Sized,
        I: TokenIssuer<R>,
    {
        let mut out = Vec::new();
        self.render(&mut out, request, page, data)?;
        Ok(out)
    }

    /// Stamp the values every page may rely on. Runs once per render, right
    /// before execution, so the token always belongs to the current request.
    fn add_default_data<R>(&self, mut data: TemplateData, request: &R) -> TemplateData
    where
        R: ?Sized,
        I: TokenIssuer<R>,
    {
        data.csrf_token = self.issuer.issue(request);
        if let Some(site) = &self.site {
            data.site = Some(site.clone());
        }
        data
    }
}
