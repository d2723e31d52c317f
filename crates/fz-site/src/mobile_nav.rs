//! Mobile navigation drawer
//!
//! Closed until the hamburger button opens it. The close button, any link
//! inside, Escape, or a click on the drawer backdrop closes it again.
//! While open the document element has `overflow: hidden`.

use std::collections::BTreeSet;

use fz_dom::{Event, EventType, NodeId};
use fz_runtime::{Context, Controller};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    pub toggle_selector: String,
    pub drawer_selector: String,
    pub close_selector: String,
    /// Links inside the drawer that close it
    pub link_selector: String,
    pub open_class: String,
    pub close_key: String,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            toggle_selector: ".hamburger-btn".into(),
            drawer_selector: "#mobile-nav".into(),
            close_selector: "#close-mobile-nav".into(),
            link_selector: "a".into(),
            open_class: "open".into(),
            close_key: "Escape".into(),
        }
    }
}

#[derive(Debug, Clone)]
struct DrawerElements {
    toggle: NodeId,
    drawer: NodeId,
    close: Option<NodeId>,
    links: BTreeSet<NodeId>,
}

#[derive(Debug)]
pub struct MobileNav {
    config: NavConfig,
    elements: Option<DrawerElements>,
    open: bool,
}

impl MobileNav {
    pub fn new(config: NavConfig) -> Self {
        Self { config, elements: None, open: false }
    }

    /// Find the drawer. Without a toggle or drawer element the controller
    /// stays inert; returns whether it mounted.
    pub fn mount(&mut self, ctx: &mut Context<'_>) -> bool {
        let document = &ctx.document;
        let find = |selector: &str| document.query_selector(selector).ok().flatten();
        let (Some(toggle), Some(drawer)) = (
            find(self.config.toggle_selector.as_str()),
            find(self.config.drawer_selector.as_str()),
        ) else {
            tracing::debug!("No mobile navigation on this page");
            return false;
        };
        let close = find(self.config.close_selector.as_str());
        let links = document
            .query_all_within(drawer, &self.config.link_selector)
            .unwrap_or_default()
            .into_iter()
            .collect();
        self.elements = Some(DrawerElements { toggle, drawer, close, links });
        true
    }

    pub fn is_mounted(&self) -> bool {
        self.elements.is_some()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self, ctx: &mut Context<'_>) {
        let Some(el) = &self.elements else {
            return;
        };
        ctx.document.add_class(el.drawer, &self.config.open_class);
        let root = ctx.document.document_element();
        ctx.document.set_style(root, "overflow", "hidden");
        self.open = true;
    }

    pub fn close(&mut self, ctx: &mut Context<'_>) {
        let Some(el) = &self.elements else {
            return;
        };
        ctx.document.remove_class(el.drawer, &self.config.open_class);
        let root = ctx.document.document_element();
        ctx.document.set_style(root, "overflow", "");
        self.open = false;
    }
}

impl Default for MobileNav {
    fn default() -> Self {
        Self::new(NavConfig::default())
    }
}

impl Controller for MobileNav {
    fn name(&self) -> &'static str {
        "mobile-nav"
    }

    fn handle_event(&mut self, ctx: &mut Context<'_>, event: &mut Event) {
        let Some(el) = &self.elements else {
            return;
        };
        let node = event.current_target;
        // Some(true) opens, Some(false) closes
        let action = match event.event_type {
            EventType::Click if node == el.toggle => {
                event.stop_propagation();
                Some(true)
            }
            EventType::Click if Some(node) == el.close => {
                event.stop_propagation();
                Some(false)
            }
            EventType::Click if el.links.contains(&node) => Some(false),
            EventType::Click if node == el.drawer && event.target == el.drawer => Some(false),
            EventType::KeyDown if node == NodeId::ROOT => {
                (event.key.as_deref() == Some(self.config.close_key.as_str())).then_some(false)
            }
            _ => None,
        };
        match action {
            Some(true) => self.open(ctx),
            Some(false) => self.close(ctx),
            None => {}
        }
    }
}
