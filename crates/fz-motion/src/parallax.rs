//! Hero parallax

use fz_dom::{Event, EventType, NodeId};
use fz_runtime::Context;

use crate::error::query_one;
use crate::{Effect, MotionConfig, MotionError};

/// Shifts the hero video a fraction of the scroll offset, bounded
#[derive(Debug)]
pub struct Parallax {
    lane: u32,
    selector: String,
    factor: f64,
    max: f64,
    target: Option<NodeId>,
}

impl Parallax {
    pub fn new(config: &MotionConfig, lane: u32) -> Self {
        Self {
            lane,
            selector: config.parallax_selector.clone(),
            factor: config.parallax_factor,
            max: config.parallax_max,
            target: None,
        }
    }

    pub fn shift(&self, scroll_y: f64) -> f64 {
        (scroll_y * self.factor).clamp(-self.max, self.max)
    }

    fn update(&self, ctx: &mut Context<'_>) {
        if let Some(target) = self.target {
            let shift = self.shift(ctx.window.scroll_y());
            ctx.document
                .set_style(target, "transform", &format!("translateY({}px)", shift));
        }
    }
}

impl Effect for Parallax {
    fn name(&self) -> &'static str {
        "hero-parallax"
    }

    fn lane(&self) -> u32 {
        self.lane
    }

    fn init(&mut self, ctx: &mut Context<'_>) -> Result<(), MotionError> {
        self.target = query_one(&ctx.document, &self.selector)?;
        self.update(ctx);
        Ok(())
    }

    fn handle_event(&mut self, ctx: &mut Context<'_>, event: &mut Event) {
        if event.is_at(EventType::Scroll, NodeId::ROOT) {
            self.update(ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fz_dom::Document;
    use fz_runtime::{Host, Storage, Window};

    #[test]
    fn test_shift_is_bounded() {
        let parallax = Parallax::new(&MotionConfig::default(), 2);
        assert_eq!(parallax.shift(0.0), 0.0);
        assert_eq!(parallax.shift(100.0), 8.0);
        assert_eq!(parallax.shift(500.0), 40.0);
        assert_eq!(parallax.shift(10_000.0), 40.0);
    }

    #[test]
    fn test_transform_follows_scroll() {
        let mut document = Document::default();
        let body = document.body();
        let video = document.append_element(body, "video", &[("class", "hero-video")]);
        let mut host = Host::new(document, Window::default(), Storage::session());

        let mut parallax = Parallax::new(&MotionConfig::default(), 2);
        parallax.init(&mut Context::new(&mut host, 0)).unwrap();
        assert_eq!(host.document.style(video, "transform"), Some("translateY(0px)"));

        host.window.scroll_to(250.0);
        parallax.handle_event(&mut Context::new(&mut host, 0), &mut Event::scroll());
        assert_eq!(host.document.style(video, "transform"), Some("translateY(20px)"));

        host.window.scroll_to(5000.0);
        parallax.handle_event(&mut Context::new(&mut host, 0), &mut Event::scroll());
        assert_eq!(host.document.style(video, "transform"), Some("translateY(40px)"));
    }
}
