//! Booking errors

use fz_runtime::StorageError;

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("booking widget element #{0} is missing")]
    MissingElement(&'static str),

    #[error("booked slots under {key:?} are not valid JSON: {source}")]
    CorruptStore {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialise booked slots: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
