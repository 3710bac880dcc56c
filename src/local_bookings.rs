use crate::{backend::BookingBackend, error::StoreError, types::Booking};
use chrono::NaiveTime;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};
use tracing::debug;
use uuid::Uuid;

const EXAMPLE_BOOKERS: [&str; 3] = ["Alice", "Bob", "Charlie"];

#[derive(Debug, Clone, Default)]
pub struct LocalBookings {
    bookings: Arc<Mutex<HashMap<Uuid, Booking>>>,
}

impl LocalBookings {
    /// A store pre-filled with three bookings at 09:00.
    pub fn with_example_bookings() -> Self {
        let local_bookings = Self::default();
        if let Ok(mut bookings) = local_bookings.bookings.lock() {
            for name in EXAMPLE_BOOKERS {
                let booking_id = Uuid::new_v4();
                bookings.insert(
                    booking_id,
                    Booking {
                        booking_id,
                        booking_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN),
                        name: name.into(),
                    },
                );
            }
        }
        local_bookings
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<Uuid, Booking>>, StoreError> {
        self.bookings.lock().map_err(|_| StoreError::LockPoisoned)
    }
}

impl BookingBackend for LocalBookings {
    fn bookings(&self) -> Result<Vec<Booking>, StoreError> {
        let mut bookings: Vec<Booking> = self.lock()?.values().cloned().collect();
        bookings.sort_unstable_by(|a, b| {
            a.booking_time
                .cmp(&b.booking_time)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(bookings)
    }

    fn booking_by_name(&self, name: &str) -> Result<Option<Booking>, StoreError> {
        let name = name.to_lowercase();
        Ok(self
            .lock()?
            .values()
            .find(|booking| booking.name.to_lowercase() == name)
            .cloned())
    }

    fn count_at(&self, time: NaiveTime, excluding: Option<Uuid>) -> Result<usize, StoreError> {
        Ok(self
            .lock()?
            .values()
            .filter(|booking| booking.booking_time == time)
            .filter(|booking| Some(booking.booking_id) != excluding)
            .count())
    }

    fn insert_booking(&self, booking: &Booking) -> Result<(), StoreError> {
        debug!(id = %booking.booking_id, "Storing booking in memory");
        self.lock()?.insert(booking.booking_id, booking.clone());
        Ok(())
    }

    fn update_booking_time(&self, id: Uuid, time: NaiveTime) -> Result<(), StoreError> {
        match self.lock()?.get_mut(&id) {
            Some(booking) => {
                booking.booking_time = time;
                Ok(())
            }
            None => Err(StoreError::MissingBooking(id)),
        }
    }

    fn remove_booking(&self, id: Uuid) -> Result<(), StoreError> {
        if self.lock()?.remove(&id).is_none() {
            return Err(StoreError::MissingBooking(id));
        }
        Ok(())
    }
}
