//! Counter animation
//!
//! `.stat` containers count their first `h3` up from zero once visible.
//! The heading text is parsed into a target and an optional `+` suffix,
//! and each frame renders `floor(target * easeOutCubic(t))` with locale
//! grouping until the duration elapses.

use std::collections::BTreeSet;

use fz_dom::NodeId;
use fz_runtime::{Context, IntersectionObserverEntry, ObserverId, TaskToken};

use crate::error::query_all;
use crate::{Effect, MotionConfig, MotionError, VisibilityObserver};

const ORIGINAL_ATTR: &str = "data-original";

/// Number and suffix read from a counter heading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCounter {
    pub target: u64,
    pub suffix: String,
}

/// Parse counter text such as `"1,234+"` or `"4,5"`.
///
/// Characters other than digits, `.` and `,` are dropped. A separator
/// followed by exactly three digits groups thousands; any other separator
/// starts the fraction, and everything after a second fraction separator
/// is ignored. The value is rounded half away from zero.
pub fn parse_counter(raw: &str) -> ParsedCounter {
    let raw = raw.trim();
    let suffix = if raw.ends_with('+') { "+" } else { "" };
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .collect();

    let mut groups = cleaned.split(['.', ',']);
    let mut integer = groups.next().unwrap_or("").to_string();
    let mut fraction = "";
    for group in groups {
        if group.len() == 3 {
            integer.push_str(group);
        } else {
            fraction = group;
            break;
        }
    }

    let integer = if integer.is_empty() { "0" } else { integer.as_str() };
    let value: f64 = if fraction.is_empty() {
        integer.parse().unwrap_or(0.0)
    } else {
        format!("{}.{}", integer, fraction).parse().unwrap_or(0.0)
    };
    ParsedCounter {
        target: value.round() as u64,
        suffix: suffix.to_string(),
    }
}

pub fn ease_out_cubic(t: f64) -> f64 {
    1.0 - (1.0 - t).powi(3)
}

/// Format with a thousands separator: `format_grouped(1234, '.') == "1.234"`
pub fn format_grouped(n: u64, separator: char) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(c);
    }
    out
}

#[derive(Debug, Clone)]
struct Run {
    heading: NodeId,
    target: u64,
    suffix: String,
    start: f64,
    duration: f64,
    done: bool,
}

#[derive(Debug)]
pub struct CounterAnimator {
    lane: u32,
    selector: String,
    threshold: f64,
    duration_ms: f64,
    long_duration_ms: f64,
    long_above: u64,
    fallback_duration_ms: f64,
    separator: char,
    observer: Option<VisibilityObserver>,
    bound: BTreeSet<NodeId>,
    /// Headings that already started
    animated: BTreeSet<NodeId>,
    /// Indexed by task token `seq`
    runs: Vec<Run>,
}

impl CounterAnimator {
    pub fn new(config: &MotionConfig, lane: u32) -> Self {
        Self {
            lane,
            selector: config.counter_selector.clone(),
            threshold: config.counter_threshold,
            duration_ms: config.counter_duration_ms,
            long_duration_ms: config.counter_long_duration_ms,
            long_above: config.counter_long_above,
            fallback_duration_ms: config.counter_fallback_duration_ms,
            separator: config.grouping_separator,
            observer: None,
            bound: BTreeSet::new(),
            animated: BTreeSet::new(),
            runs: Vec::new(),
        }
    }

    /// Animation length for a target
    pub fn duration_for(&self, target: u64) -> f64 {
        let base = if target > self.long_above {
            self.long_duration_ms
        } else {
            self.duration_ms
        };
        base.clamp(900.0, 3000.0)
    }

    pub fn running(&self) -> usize {
        self.runs.iter().filter(|r| !r.done).count()
    }

    /// Start counting the heading of `container`, once per heading
    fn start(&mut self, ctx: &mut Context<'_>, container: NodeId, duration: Option<f64>) {
        let Some(heading) = ctx.document.query_within(container, "h3").ok().flatten() else {
            return;
        };
        if !self.animated.insert(heading) {
            return;
        }
        let raw = ctx.document.text_content(heading).trim().to_string();
        let parsed = parse_counter(&raw);
        ctx.document.set_attr(heading, ORIGINAL_ATTR, &raw);

        let duration = duration.unwrap_or_else(|| self.duration_for(parsed.target));
        tracing::debug!("Counting {:?} to {} over {}ms", raw, parsed.target, duration);
        let seq = self.runs.len() as u32;
        self.runs.push(Run {
            heading,
            target: parsed.target,
            suffix: parsed.suffix,
            start: ctx.now(),
            duration,
            done: false,
        });
        ctx.request_animation_frame(TaskToken::new(self.lane, seq));
    }
}

impl Effect for CounterAnimator {
    fn name(&self) -> &'static str {
        "counters"
    }

    fn lane(&self) -> u32 {
        self.lane
    }

    fn init(&mut self, ctx: &mut Context<'_>) -> Result<(), MotionError> {
        let fresh: Vec<NodeId> = query_all(&ctx.document, &self.selector)?
            .into_iter()
            .filter(|n| !self.bound.contains(n))
            .collect();
        if fresh.is_empty() {
            return Ok(());
        }

        if ctx.window.supports_intersection_observer() {
            if self.observer.is_none() {
                self.observer = Some(VisibilityObserver::install(ctx, "0px", self.threshold)?);
            }
            if let Some(observer) = self.observer.as_mut() {
                for &container in &fresh {
                    observer.watch(ctx, container)?;
                }
            }
        } else {
            let duration = self.fallback_duration_ms;
            for &container in &fresh {
                self.start(ctx, container, Some(duration));
            }
        }
        self.bound.extend(fresh);
        Ok(())
    }

    fn on_intersection(
        &mut self,
        ctx: &mut Context<'_>,
        observer: ObserverId,
        entries: &[IntersectionObserverEntry],
    ) {
        let visible = match self.observer.as_mut().filter(|o| o.id() == observer) {
            Some(visibility) => visibility.take_visible(ctx, entries),
            None => return,
        };
        for container in visible {
            self.start(ctx, container, None);
        }
    }

    fn on_frame(&mut self, ctx: &mut Context<'_>, seq: u32, now: f64) {
        let separator = self.separator;
        let Some(run) = self.runs.get_mut(seq as usize).filter(|r| !r.done) else {
            return;
        };
        let t = ((now - run.start) / run.duration).clamp(0.0, 1.0);
        let text = if t < 1.0 {
            let value = (run.target as f64 * ease_out_cubic(t)).floor() as u64;
            ctx.request_animation_frame(TaskToken::new(self.lane, seq));
            format!("{}{}", format_grouped(value, separator), run.suffix)
        } else {
            run.done = true;
            format!("{}{}", format_grouped(run.target, separator), run.suffix)
        };
        ctx.document.set_text(run.heading, &text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_counter() {
        assert_eq!(parse_counter("1,234+"), ParsedCounter { target: 1234, suffix: "+".into() });
        assert_eq!(parse_counter("  250 ").target, 250);
        assert_eq!(parse_counter("4,5").target, 5);
        assert_eq!(parse_counter("98%").suffix, "");
        assert_eq!(parse_counter("12.345.678").target, 12_345_678);
        assert_eq!(parse_counter("1.234,5").target, 1235);
        assert_eq!(parse_counter("years").target, 0);
        assert_eq!(parse_counter("").target, 0);
    }

    #[test]
    fn test_format_grouped() {
        assert_eq!(format_grouped(0, '.'), "0");
        assert_eq!(format_grouped(999, '.'), "999");
        assert_eq!(format_grouped(1234, '.'), "1.234");
        assert_eq!(format_grouped(1_234_567, ' '), "1 234 567");
    }

    #[test]
    fn test_ease_out_cubic() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert_eq!(ease_out_cubic(0.5), 0.875);
    }

    #[test]
    fn test_duration() {
        let counters = CounterAnimator::new(&MotionConfig::default(), 5);
        assert_eq!(counters.duration_for(1000), 1500.0);
        assert_eq!(counters.duration_for(1001), 1800.0);

        let config = MotionConfig { counter_duration_ms: 100.0, ..Default::default() };
        assert_eq!(CounterAnimator::new(&config, 5).duration_for(3), 900.0);
    }
}
