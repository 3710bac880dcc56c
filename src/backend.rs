use crate::error::StoreError;
use crate::types::Booking;
use chrono::NaiveTime;
use uuid::Uuid;

/// Storage for bookings. Implementations do no business-rule checks.
pub trait BookingBackend: Clone + Send + Sync + 'static {
    /// All bookings, ordered by time and then by name.
    fn bookings(&self) -> Result<Vec<Booking>, StoreError>;

    /// Case-insensitive lookup.
    ///
    /// The in-memory store folds case with Rust's Unicode `to_lowercase`,
    /// PostgreSQL with `lower()` under the database's collation. Both agree
    /// on ASCII names. For some non-ASCII names (e.g. Turkish dotted and
    /// dotless `i`, or a final Greek sigma) the two stores can disagree on
    /// whether two names match.
    fn booking_by_name(&self, name: &str) -> Result<Option<Booking>, StoreError>;

    fn count_at(&self, time: NaiveTime, excluding: Option<Uuid>) -> Result<usize, StoreError>;
    /// Fails with [`StoreError::NameTaken`] if the store itself enforces
    /// unique names and already holds this one.
    fn insert_booking(&self, booking: &Booking) -> Result<(), StoreError>;
    fn update_booking_time(&self, id: Uuid, time: NaiveTime) -> Result<(), StoreError>;
    fn remove_booking(&self, id: Uuid) -> Result<(), StoreError>;
}
