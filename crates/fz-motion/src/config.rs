//! Motion configuration

use serde::Deserialize;

/// Selectors, thresholds and timings for every motion controller
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Elements revealed once on scroll
    pub reveal_selector: String,
    pub reveal_root_margin: String,
    pub reveal_threshold: f64,
    /// Fallback polling reveals elements whose top is above this share of
    /// the viewport height
    pub reveal_fallback_ratio: f64,

    /// Dynamically rebuilt content revealed on scroll
    pub rebuild_selector: String,
    pub rebuild_threshold: f64,

    /// Header candidates, first match wins
    pub header_selectors: Vec<String>,
    /// Scroll offset past which the header shrinks
    pub shrink_threshold: f64,

    pub parallax_selector: String,
    pub parallax_factor: f64,
    /// Largest shift in either direction, in pixels
    pub parallax_max: f64,

    pub anchor_selector: String,

    pub button_selector: String,
    pub press_transition: String,
    pub press_transform: String,

    /// Counter containers; the first `h3` inside holds the number
    pub counter_selector: String,
    pub counter_threshold: f64,
    pub counter_duration_ms: f64,
    /// Used for targets above `counter_long_above`
    pub counter_long_duration_ms: f64,
    pub counter_long_above: u64,
    /// Used when counters start without an intersection observer
    pub counter_fallback_duration_ms: f64,
    pub grouping_separator: char,

    /// Added to the document element once every controller started
    pub ready_class: String,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            reveal_selector: ".reveal, .reveal-stagger".into(),
            reveal_root_margin: "0px 0px -10% 0px".into(),
            reveal_threshold: 0.12,
            reveal_fallback_ratio: 0.88,
            rebuild_selector: ".rebuild, .animated-element".into(),
            rebuild_threshold: 0.2,
            header_selectors: vec![".main-header".into(), ".navbar".into()],
            shrink_threshold: 80.0,
            parallax_selector: ".hero-video".into(),
            parallax_factor: 0.08,
            parallax_max: 40.0,
            anchor_selector: r##"a[href^="#"]"##.into(),
            button_selector: "button, .btn-anim, .cta-button".into(),
            press_transition: "transform 120ms ease".into(),
            press_transform: "scale(0.96)".into(),
            counter_selector: ".stat".into(),
            counter_threshold: 0.35,
            counter_duration_ms: 1500.0,
            counter_long_duration_ms: 1800.0,
            counter_long_above: 1000,
            counter_fallback_duration_ms: 1500.0,
            grouping_separator: '.',
            ready_class: "js-animations-ready".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: MotionConfig =
            serde_json::from_str(r#"{ "shrink_threshold": 120, "grouping_separator": " " }"#).unwrap();
        assert_eq!(config.shrink_threshold, 120.0);
        assert_eq!(config.grouping_separator, ' ');
        assert_eq!(config.reveal_threshold, 0.12);
        assert_eq!(config.header_selectors, [".main-header", ".navbar"]);
    }
}
