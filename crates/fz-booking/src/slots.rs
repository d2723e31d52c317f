//! Hourly time slots

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    /// `HH:00`
    pub time: String,
    pub booked: bool,
}

impl Slot {
    pub fn is_available(&self) -> bool {
        !self.booked
    }
}

/// `HH:00` label for an hour
pub fn slot_label(hour: u32) -> String {
    format!("{:02}:00", hour)
}

/// One slot per hour from `first_hour` to `last_hour` inclusive, marked
/// booked when its label appears in `booked`
pub fn generate_slots(first_hour: u32, last_hour: u32, booked: &[String]) -> Vec<Slot> {
    (first_hour..=last_hour)
        .map(|hour| {
            let time = slot_label(hour);
            let booked = booked.iter().any(|b| *b == time);
            Slot { time, booked }
        })
        .collect()
}
