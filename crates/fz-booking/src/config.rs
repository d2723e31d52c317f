//! Booking configuration

use serde::Deserialize;

use crate::Locale;

/// What to do when the stored bookings are not valid JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorruptStorePolicy {
    /// Log a warning and start from an empty store
    #[default]
    Reset,
    /// Surface the parse error
    Fail,
}

/// Demo bookings written once for a showcase date
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SeedConfig {
    /// ISO date
    pub date: String,
    pub times: Vec<String>,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            date: "2025-11-12".into(),
            times: vec!["10:00".into(), "13:00".into()],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BookingConfig {
    /// localStorage key holding the booked slots
    pub storage_key: String,
    pub first_hour: u32,
    /// Inclusive
    pub last_hour: u32,
    /// `null` disables seeding
    pub seed: Option<SeedConfig>,
    pub confirmation_hide_ms: f64,
    pub corrupt_store: CorruptStorePolicy,
    pub locale: Locale,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            storage_key: "bookedSlots".into(),
            first_hour: 8,
            last_hour: 15,
            seed: Some(SeedConfig::default()),
            confirmation_hide_ms: 5000.0,
            corrupt_store: CorruptStorePolicy::default(),
            locale: Locale::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_overrides() {
        let config: BookingConfig = serde_json::from_str(
            r#"{ "seed": null, "corrupt_store": "fail", "locale": { "no_slots": "None left" } }"#,
        )
        .unwrap();
        assert!(config.seed.is_none());
        assert_eq!(config.corrupt_store, CorruptStorePolicy::Fail);
        assert_eq!(config.locale.no_slots, "None left");
        assert_eq!(config.locale.months[10], "Novembar");
        assert_eq!(config.storage_key, "bookedSlots");
    }

    #[test]
    fn test_defaults() {
        let config = BookingConfig::default();
        assert_eq!((config.first_hour, config.last_hour), (8, 15));
        assert_eq!(config.seed.unwrap().date, "2025-11-12");
    }
}
