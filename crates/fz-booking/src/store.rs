//! Booked slots store
//!
//! One localStorage key holding a JSON object of ISO date to the list of
//! booked `HH:00` times, in booking order. Every operation re-reads the
//! key, so other writers are picked up, but nothing guards against a
//! concurrent read-modify-write.

use std::collections::BTreeMap;

use fz_runtime::Storage;
use serde::{Deserialize, Serialize};

use crate::{BookingError, CorruptStorePolicy, SeedConfig};

/// Decoded store contents
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookedSlots {
    dates: BTreeMap<String, Vec<String>>,
}

impl BookedSlots {
    pub fn times_for(&self, date: &str) -> &[String] {
        self.dates.get(date).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn push(&mut self, date: &str, time: &str) {
        self.dates.entry(date.to_string()).or_default().push(time.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct BookedSlotsStore {
    key: String,
    policy: CorruptStorePolicy,
}

impl BookedSlotsStore {
    pub fn new(key: &str, policy: CorruptStorePolicy) -> Self {
        Self { key: key.to_string(), policy }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the store; a missing key is an empty store
    pub fn load(&self, storage: &Storage) -> Result<BookedSlots, BookingError> {
        let Some(raw) = storage.get_item(&self.key) else {
            return Ok(BookedSlots::default());
        };
        match serde_json::from_str(raw) {
            Ok(slots) => Ok(slots),
            Err(source) => match self.policy {
                CorruptStorePolicy::Reset => {
                    tracing::warn!("Ignoring malformed {:?} store: {}", self.key, source);
                    Ok(BookedSlots::default())
                }
                CorruptStorePolicy::Fail => Err(BookingError::CorruptStore {
                    key: self.key.clone(),
                    source,
                }),
            },
        }
    }

    pub fn save(&self, storage: &mut Storage, slots: &BookedSlots) -> Result<(), BookingError> {
        let json = serde_json::to_string(slots).map_err(BookingError::Serialize)?;
        storage.set_item(&self.key, &json)?;
        Ok(())
    }

    /// Append `time` to `date`'s list and persist. Duplicates are kept.
    pub fn append(&self, storage: &mut Storage, date: &str, time: &str) -> Result<(), BookingError> {
        let mut slots = self.load(storage)?;
        if slots.times_for(date).iter().any(|t| t == time) {
            tracing::warn!("{} {} is already booked, appending anyway", date, time);
        }
        slots.push(date, time);
        self.save(storage, &slots)?;
        tracing::info!("Booked {} at {}", date, time);
        Ok(())
    }

    /// Write the demo bookings if the seed date has none. Returns true if
    /// anything was written.
    pub fn seed_if_empty(&self, storage: &mut Storage, seed: &SeedConfig) -> Result<bool, BookingError> {
        let mut slots = self.load(storage)?;
        if !slots.times_for(&seed.date).is_empty() {
            return Ok(false);
        }
        for time in &seed.times {
            slots.push(&seed.date, time);
        }
        self.save(storage, &slots)?;
        tracing::debug!("Seeded {} demo bookings on {}", seed.times.len(), seed.date);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> BookedSlotsStore {
        BookedSlotsStore::new("bookedSlots", CorruptStorePolicy::Reset)
    }

    #[test]
    fn test_missing_key_is_empty() {
        assert!(store().load(&Storage::session()).unwrap().is_empty());
    }

    #[test]
    fn test_append_keeps_order_and_duplicates() {
        let mut storage = Storage::session();
        let store = store();
        store.append(&mut storage, "2025-06-11", "14:00").unwrap();
        store.append(&mut storage, "2025-06-11", "09:00").unwrap();
        store.append(&mut storage, "2025-06-11", "14:00").unwrap();

        assert_eq!(
            storage.get_item("bookedSlots"),
            Some(r#"{"2025-06-11":["14:00","09:00","14:00"]}"#)
        );
    }

    #[test]
    fn test_seed_runs_once() {
        let mut storage = Storage::session();
        let store = store();
        let seed = SeedConfig::default();
        assert!(store.seed_if_empty(&mut storage, &seed).unwrap());
        assert!(!store.seed_if_empty(&mut storage, &seed).unwrap());
        assert_eq!(store.load(&storage).unwrap().times_for("2025-11-12"), ["10:00", "13:00"]);
    }

    #[test]
    fn test_seed_skips_booked_date() {
        let mut storage = Storage::session();
        storage.set_item("bookedSlots", r#"{"2025-11-12":["09:00"]}"#).unwrap();
        assert!(!store().seed_if_empty(&mut storage, &SeedConfig::default()).unwrap());
        assert_eq!(store().load(&storage).unwrap().times_for("2025-11-12"), ["09:00"]);
    }

    #[test]
    fn test_corrupt_store_policies() {
        let mut storage = Storage::session();
        storage.set_item("bookedSlots", "{oops").unwrap();
        assert!(store().load(&storage).unwrap().is_empty());

        let strict = BookedSlotsStore::new("bookedSlots", CorruptStorePolicy::Fail);
        assert!(matches!(strict.load(&storage), Err(BookingError::CorruptStore { .. })));
        assert!(strict.append(&mut storage, "2025-06-11", "08:00").is_err());
        assert_eq!(storage.get_item("bookedSlots"), Some("{oops"));
    }

    #[test]
    fn test_write_failure_propagates() {
        let mut storage = Storage::session().with_quota(8);
        let err = store().append(&mut storage, "2025-06-11", "08:00").unwrap_err();
        assert!(matches!(err, BookingError::Storage(_)));
    }
}
