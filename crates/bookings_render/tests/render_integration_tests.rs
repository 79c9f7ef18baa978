//! Integration tests for template discovery and page rendering.

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use bookings_forms::Form;
use bookings_render::{
    CacheBuilder, RenderConfig, RenderError, SiteContext, TemplateData, TemplateRenderer,
};
use tempfile::{tempdir, TempDir};

fn template_dir(files: &[(&str, &str)]) -> TempDir {
    let dir = tempdir().unwrap();
    for (name, content) in files {
        fs::write(dir.path().join(name), content).unwrap();
    }
    dir
}

fn fixed_token(_request: &str) -> String {
    "fixed-token".to_string()
}

fn render(dir: &Path, page: &str, data: TemplateData) -> Result<String, RenderError> {
    let renderer = TemplateRenderer::new(RenderConfig::new(dir), fixed_token)?;
    let out = renderer.render_to_vec("request", page, data)?;
    Ok(String::from_utf8(out).unwrap())
}

#[test]
fn test_page_without_layouts() {
    let dir = template_dir(&[("home.page.tmpl", "Hello {{ string_map.name }}")]);

    let data = TemplateData::new().with_string("name", "World");
    let output = render(dir.path(), "home.page.tmpl", data).unwrap();

    assert_eq!(output, "Hello World");
}

#[test]
fn test_every_page_renders_against_empty_data() {
    let dir = template_dir(&[
        ("home.page.tmpl", "home"),
        ("about.page.tmpl", "{{ flash }}about{{ error }}"),
        ("contact.page.tmpl", "{% if form.errors.email %}bad{% endif %}contact"),
    ]);

    let config = RenderConfig::new(dir.path());
    let cache = CacheBuilder::new(&config).build().unwrap();
    let names: Vec<String> = cache.page_names().iter().map(|n| n.to_string()).collect();
    assert_eq!(names.len(), 3);

    let renderer = TemplateRenderer::with_cache(config, cache, fixed_token);
    for name in &names {
        let out = renderer
            .render_to_vec("request", name, TemplateData::new())
            .unwrap();
        assert!(!out.is_empty(), "{} rendered nothing", name);
    }
}

#[test]
fn test_page_wrapped_in_layout() {
    let dir = template_dir(&[
        (
            "base.layout.tmpl",
            "LAYOUT[{% block content %}{% endblock content %}]",
        ),
        (
            "page.page.tmpl",
            r#"{% extends "base.layout.tmpl" %}{% block content %}PAGE{% endblock content %}"#,
        ),
    ]);

    let output = render(dir.path(), "page.page.tmpl", TemplateData::new()).unwrap();
    assert_eq!(output, "LAYOUT[PAGE]");
}

#[test]
fn test_layout_marker_reaches_every_page() {
    let dir = template_dir(&[
        (
            "base.layout.tmpl",
            "<!-- layout-marker -->{% block content %}{% endblock content %}",
        ),
        (
            "home.page.tmpl",
            r#"{% extends "base.layout.tmpl" %}{% block content %}home{% endblock content %}"#,
        ),
        (
            "about.page.tmpl",
            r#"{% extends "base.layout.tmpl" %}{% block content %}about{% endblock content %}"#,
        ),
    ]);

    for page in ["home.page.tmpl", "about.page.tmpl"] {
        let output = render(dir.path(), page, TemplateData::new()).unwrap();
        assert!(output.contains("<!-- layout-marker -->"), "{} lost its layout", page);
    }
}

#[test]
fn test_missing_page_is_not_found() {
    let dir = template_dir(&[("home.page.tmpl", "home")]);

    let renderer = TemplateRenderer::new(RenderConfig::new(dir.path()), fixed_token).unwrap();
    let mut out = Vec::new();
    let err = renderer
        .render(&mut out, "request", "missing.page.tmpl", TemplateData::new())
        .unwrap_err();

    assert!(err.is_not_found());
    assert!(out.is_empty());
}

#[test]
fn test_missing_page_without_cache_is_not_found() {
    let dir = template_dir(&[("home.page.tmpl", "home")]);

    let config = RenderConfig::new(dir.path()).with_cache(false);
    let renderer = TemplateRenderer::new(config, fixed_token).unwrap();
    let err = renderer
        .render_to_vec("request", "missing.page.tmpl", TemplateData::new())
        .unwrap_err();

    assert!(matches!(err, RenderError::NotFound(ref page) if page == "missing.page.tmpl"));
}

#[test]
fn test_execution_error_writes_nothing() {
    let dir = template_dir(&[("room.page.tmpl", "before {{ entity.name }} after")]);

    let renderer = TemplateRenderer::new(RenderConfig::new(dir.path()), fixed_token).unwrap();
    let mut out = Vec::new();
    let err = renderer
        .render(&mut out, "request", "room.page.tmpl", TemplateData::new())
        .unwrap_err();

    assert!(matches!(err, RenderError::Execution { .. }));
    assert!(out.is_empty());
}

#[test]
fn test_tokens_are_fresh_per_request() {
    let dir = template_dir(&[("form.page.tmpl", "{{ csrf_token }}")]);
    let renderer = TemplateRenderer::new(RenderConfig::new(dir.path()), |request: &str| {
        format!("token-for-{}", request)
    })
    .unwrap();

    let first = renderer
        .render_to_vec("visitor-a", "form.page.tmpl", TemplateData::new())
        .unwrap();
    let second = renderer
        .render_to_vec("visitor-b", "form.page.tmpl", TemplateData::new())
        .unwrap();

    assert_eq!(first, b"token-for-visitor-a");
    assert_eq!(second, b"token-for-visitor-b");
}

#[test]
fn test_issuer_called_once_per_render() {
    let dir = template_dir(&[("form.page.tmpl", "{{ csrf_token }}")]);
    let calls = AtomicUsize::new(0);
    let renderer = TemplateRenderer::new(RenderConfig::new(dir.path()), |_: &()| {
        format!("t{}", calls.fetch_add(1, Ordering::SeqCst))
    })
    .unwrap();

    let first = renderer
        .render_to_vec(&(), "form.page.tmpl", TemplateData::new())
        .unwrap();
    let second = renderer
        .render_to_vec(&(), "form.page.tmpl", TemplateData::new())
        .unwrap();

    assert_eq!(first, b"t0");
    assert_eq!(second, b"t1");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_rendering_is_idempotent() {
    let dir = template_dir(&[
        (
            "base.layout.tmpl",
            "<main>{% block content %}{% endblock content %}</main>",
        ),
        (
            "summary.page.tmpl",
            r#"{% extends "base.layout.tmpl" %}{% block content %}{{ string_map.name }} {{ int_map.nights }} {{ csrf_token }}{% endblock content %}"#,
        ),
    ]);

    let data = TemplateData::new()
        .with_string("name", "Ada")
        .with_int("nights", 2);

    let first = render(dir.path(), "summary.page.tmpl", data.clone()).unwrap();
    let second = render(dir.path(), "summary.page.tmpl", data).unwrap();

    assert_eq!(first, second);
    assert_eq!(first, "<main>Ada 2 fixed-token</main>");
}

#[test]
fn test_uncached_renderer_picks_up_edits() {
    let dir = template_dir(&[("home.page.tmpl", "v1")]);
    let config = RenderConfig::new(dir.path()).with_cache(false);
    let renderer = TemplateRenderer::new(config, fixed_token).unwrap();

    let before = renderer
        .render_to_vec("r", "home.page.tmpl", TemplateData::new())
        .unwrap();
    fs::write(dir.path().join("home.page.tmpl"), "v2").unwrap();
    let after = renderer
        .render_to_vec("r", "home.page.tmpl", TemplateData::new())
        .unwrap();

    assert_eq!(before, b"v1");
    assert_eq!(after, b"v2");
}

#[test]
fn test_uncached_renderer_surfaces_broken_edit() {
    let dir = template_dir(&[("home.page.tmpl", "fine")]);
    let config = RenderConfig::new(dir.path()).with_cache(false);
    let renderer = TemplateRenderer::new(config, fixed_token).unwrap();

    fs::write(dir.path().join("home.page.tmpl"), "{% for %}").unwrap();
    let err = renderer
        .render_to_vec("r", "home.page.tmpl", TemplateData::new())
        .unwrap_err();

    assert!(err.is_build_error());
}

#[test]
fn test_form_errors_and_site_reach_template() {
    let dir = template_dir(&[(
        "reserve.page.tmpl",
        "{{ site.name }}|{{ form.values.first_name }}|{{ form.errors.email.0 }}",
    )]);

    let mut values = std::collections::HashMap::new();
    values.insert("first_name".to_string(), "Ada".to_string());
    let mut form = Form::new(values);
    form.is_email("email");

    let renderer = TemplateRenderer::new(RenderConfig::new(dir.path()), fixed_token)
        .unwrap()
        .with_site(SiteContext::new("Fort Smythe", true));
    let out = renderer
        .render_to_vec("r", "reserve.page.tmpl", TemplateData::new().with_form(form))
        .unwrap();

    assert_eq!(
        String::from_utf8(out).unwrap(),
        "Fort Smythe|Ada|Invalid email address"
    );
}

#[test]
fn test_output_is_html_escaped() {
    let dir = template_dir(&[("home.page.tmpl", "{{ string_map.name }}")]);

    let data = TemplateData::new().with_string("name", "<script>");
    let output = render(dir.path(), "home.page.tmpl", data).unwrap();

    assert_eq!(output, "&lt;script&gt;");
}
