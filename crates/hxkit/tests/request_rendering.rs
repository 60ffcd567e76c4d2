use std::fs;
use std::path::Path;
use std::sync::Arc;

use http::{HeaderMap, HeaderValue, Uri};
use hxkit::{
    render_for_request, respond, Component, DirSource, HxResponse, MemoryCache, RenderError,
    Trigger,
};
use serde::Serialize;
use serial_test::serial;
use tempfile::TempDir;

fn write(root: &Path, name: &str, content: &str) {
    let path = root.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn template_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "layout/base.html",
        "<html><head><title>{{ global.site }}</title></head>\
         <body>{{ partials.content }}{% include 'footer.html' %}</body></html>",
    );
    write(dir.path(), "layout/footer.html", "<footer>{{ global.site }}</footer>");
    write(
        dir.path(),
        "items/list.html",
        "<ul id=\"items\" data-path=\"{{ url.path }}\">\
         {% for item in data.items %}<li>{{ item.name }}</li>{% endfor %}</ul>\
         {% if ctx.hx_target %}<!-- {{ ctx.hx_target }} -->{% endif %}",
    );
    dir
}

#[derive(Serialize)]
struct Item {
    name: &'static str,
}

#[derive(Serialize)]
struct ListPage {
    items: Vec<Item>,
}

fn list_page(dir: &TempDir, cache: &Arc<MemoryCache>) -> (Component, Component) {
    let layout = Component::new(["layout/base.html", "layout/footer.html"])
        .fs(DirSource::new(dir.path()))
        .cache(cache.clone())
        .add_global_data("site", "Inventory");
    let list = Component::from_template("items/list.html")
        .fs(DirSource::new(dir.path()))
        .cache(cache.clone())
        .set_data_from(&ListPage {
            items: vec![Item { name: "bolt" }, Item { name: "nut" }],
        })
        .unwrap()
        .wrap(&layout, "content");
    (layout, list)
}

fn htmx_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("hx-request", HeaderValue::from_static("true"));
    headers.insert("hx-target", HeaderValue::from_static("items"));
    headers
}

#[test]
fn test_full_page_for_plain_request() {
    let dir = template_dir();
    let cache = Arc::new(MemoryCache::new());
    let (_layout, list) = list_page(&dir, &cache);
    let uri: Uri = "/items?sort=name".parse().unwrap();

    let html = render_for_request(&list, &uri, &HeaderMap::new()).unwrap();
    let html = html.as_str();

    assert!(html.starts_with("<html><head><title>Inventory</title>"));
    assert!(html.contains("<li>bolt</li><li>nut</li>"));
    assert!(html.contains("data-path=\"&#x2f;items\""));
    assert!(html.contains("<footer>Inventory</footer>"));
    assert!(!html.contains("<!--"));
}

#[test]
fn test_fragment_for_htmx_request() {
    let dir = template_dir();
    let cache = Arc::new(MemoryCache::new());
    let (_layout, list) = list_page(&dir, &cache);
    let uri: Uri = "/items".parse().unwrap();

    let html = render_for_request(&list, &uri, &htmx_headers()).unwrap();
    let html = html.as_str();

    assert!(html.starts_with("<ul id=\"items\""));
    assert!(!html.contains("<html>"));
    assert!(html.contains("<!-- items -->"));
}

#[test]
fn test_boosted_request_gets_full_page() {
    let dir = template_dir();
    let cache = Arc::new(MemoryCache::new());
    let (_layout, list) = list_page(&dir, &cache);
    let mut headers = htmx_headers();
    headers.insert("hx-boosted", HeaderValue::from_static("true"));

    let html = render_for_request(&list, &"/items".parse().unwrap(), &headers).unwrap();
    assert!(html.as_str().starts_with("<html>"));
}

#[test]
fn test_dropped_layout_fails_full_page_only() {
    let dir = template_dir();
    let cache = Arc::new(MemoryCache::new());
    let (layout, list) = list_page(&dir, &cache);
    drop(layout);
    let uri: Uri = "/items".parse().unwrap();

    assert!(matches!(
        render_for_request(&list, &uri, &HeaderMap::new()),
        Err(RenderError::DetachedWrapper { .. })
    ));
    assert!(render_for_request(&list, &uri, &htmx_headers()).is_ok());
}

#[test]
fn test_missing_template_file() {
    let dir = template_dir();
    let page = Component::from_template("nope.html")
        .fs(DirSource::new(dir.path()))
        .cache(Arc::new(MemoryCache::new()));

    let err = render_for_request(&page, &"/".parse().unwrap(), &HeaderMap::new()).unwrap_err();
    assert!(matches!(err, RenderError::TemplateNotFound { ref name } if name == "nope.html"));
}

#[test]
fn test_respond_sets_headers() {
    let dir = template_dir();
    let cache = Arc::new(MemoryCache::new());
    let (_layout, list) = list_page(&dir, &cache);

    let rendered = respond(
        &list,
        &"/items".parse().unwrap(),
        &htmx_headers(),
        &HxResponse::new()
            .push_url("/items")
            .trigger(Trigger::new().event("items-loaded")),
    )
    .unwrap();

    assert!(rendered.html.as_str().starts_with("<ul"));
    assert_eq!(rendered.headers["content-type"], "text/html; charset=utf-8");
    assert_eq!(rendered.headers["vary"], "HX-Request");
    assert_eq!(rendered.headers["hx-push-url"], "/items");
    assert_eq!(rendered.headers["hx-trigger"], "items-loaded");
}

#[test]
fn test_respond_reports_header_errors() {
    let dir = template_dir();
    let cache = Arc::new(MemoryCache::new());
    let (_layout, list) = list_page(&dir, &cache);

    let result = respond(
        &list,
        &"/items".parse().unwrap(),
        &htmx_headers(),
        &HxResponse::new().retarget("bad\r\nvalue"),
    );
    assert!(matches!(result, Err(hxkit::Error::Header(_))));
}

#[test]
#[serial]
fn test_template_edits_visible_with_cache_disabled() {
    let dir = template_dir();
    let cache = Arc::new(MemoryCache::new());
    let page = || {
        Component::from_template("page.html")
            .fs(DirSource::new(dir.path()))
            .cache(cache.clone())
    };
    let uri: Uri = "/".parse().unwrap();

    hxkit::set_template_cache_enabled(false);
    write(dir.path(), "page.html", "v1");
    let first = render_for_request(&page(), &uri, &HeaderMap::new()).unwrap();
    write(dir.path(), "page.html", "v2");
    let second = render_for_request(&page(), &uri, &HeaderMap::new()).unwrap();
    hxkit::set_template_cache_enabled(true);

    assert_eq!(first.as_str(), "v1");
    assert_eq!(second.as_str(), "v2");

    write(dir.path(), "page.html", "v3");
    let cached = render_for_request(&page(), &uri, &HeaderMap::new()).unwrap();
    assert_eq!(cached.as_str(), "v2");
}
