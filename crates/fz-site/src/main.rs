//! fz-site: load a page, boot every controller and walk through it
//!
//! Usage: fz-site [page.html] [config.json]

use anyhow::Context as _;
use fz_motion::{REVEALED_CLASS, SHRINK_CLASS};
use fz_site::{Site, SiteConfig};
use tracing_subscriber::EnvFilter;

const DEFAULT_PAGE: &str = include_str!("../assets/index.html");

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args().skip(1);
    let html = match args.next() {
        Some(path) => std::fs::read_to_string(&path).with_context(|| format!("reading {}", path))?,
        None => DEFAULT_PAGE.to_string(),
    };
    let config = match args.next() {
        Some(path) => SiteConfig::from_json_file(&path)?,
        None => SiteConfig::default(),
    };

    let mut site = Site::from_html(&html, &config)?;
    site.boot();
    site.advance(100.0);

    if let Some(booking) = site.element("booking") {
        let top = site.document().rect(booking).map(|r| r.top()).unwrap_or(0.0);
        site.scroll_to(top);
    }
    site.advance(2000.0);

    let document = site.document();
    let revealed = document
        .query_selector_all(&format!(".{}", REVEALED_CLASS))?
        .len();
    let shrunk = document
        .query_selector(&format!(".{}", SHRINK_CLASS))?
        .is_some();
    println!("fz-site v{}", env!("CARGO_PKG_VERSION"));
    println!("  scrollY:      {}", site.window().scroll_y());
    println!("  revealed:     {}", revealed);
    println!("  header shrunk: {}", shrunk);
    for stat in document.query_selector_all(".stat h3")? {
        println!("  stat:         {}", document.text_content(stat));
    }
    if let Some(title) = site.element("month-year-display") {
        println!("  calendar:     {}", document.text_content(title));
    }
    println!("  {:?}", site);
    Ok(())
}
