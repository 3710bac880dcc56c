use crate::{
    backend::BookingBackend,
    error::{BookingError, StoreError},
    schedule::{list_slots, SchedulePolicy},
    types::{Booking, BookingRequest, BookingResponse, TimeSlot},
    validation::validate_request,
};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::info;
use uuid::Uuid;

/// Booking rules on top of a [`BookingBackend`].
///
/// Create, amend and delete run their checks and their store mutation
/// while holding one write gate shared by every clone of the service, so
/// two requests can never both pass a duplicate-name or capacity check
/// that only one of them may pass.
#[derive(Clone)]
pub struct BookingService<B: BookingBackend> {
    backend: B,
    policy: SchedulePolicy,
    write_gate: Arc<Mutex<()>>,
}

impl<B: BookingBackend> BookingService<B> {
    pub fn new(backend: B, policy: SchedulePolicy) -> Self {
        Self {
            backend,
            policy,
            write_gate: Arc::default(),
        }
    }

    pub fn available_slots(&self) -> Result<Vec<TimeSlot>, BookingError> {
        let bookings = self.backend.bookings()?;
        Ok(list_slots(&self.policy, &bookings))
    }

    pub fn booking_by_name(&self, name: &str) -> Result<Booking, BookingError> {
        self.backend
            .booking_by_name(name)?
            .ok_or_else(|| BookingError::NotFound(name.to_string()))
    }

    pub fn create_booking(&self, request: &BookingRequest) -> Result<BookingResponse, BookingError> {
        let booking_time = validate_request(request, &self.policy)?;
        let _gate = self.lock_writes()?;

        if self.backend.booking_by_name(&request.name)?.is_some() {
            return Err(BookingError::DuplicateName(request.name.clone()));
        }
        if self.backend.count_at(booking_time, None)? >= self.policy.capacity {
            return Err(BookingError::SlotFull(booking_time));
        }

        let booking = Booking {
            booking_id: Uuid::new_v4(),
            booking_time,
            name: request.name.clone(),
        };
        self.backend
            .insert_booking(&booking)
            .map_err(|err| match err {
                StoreError::NameTaken(name) => BookingError::DuplicateName(name),
                err => BookingError::Store(err),
            })?;

        info!(id = %booking.booking_id, name = %booking.name, time = %booking_time, "Booking created");
        Ok(BookingResponse {
            booking_id: booking.booking_id,
        })
    }

    /// Moves the booking held by `name` to `new_booking_time`. The booking
    /// keeps its id, and its own current slot does not count against
    /// capacity.
    pub fn amend_booking(
        &self,
        name: &str,
        new_booking_time: &str,
    ) -> Result<BookingResponse, BookingError> {
        let _gate = self.lock_writes()?;
        let booking = self.booking_by_name(name)?;

        let request = BookingRequest {
            name: name.to_string(),
            booking_time: new_booking_time.to_string(),
        };
        let new_time = validate_request(&request, &self.policy)?;

        if self
            .backend
            .count_at(new_time, Some(booking.booking_id))?
            >= self.policy.capacity
        {
            return Err(BookingError::SlotFull(new_time));
        }
        self.backend
            .update_booking_time(booking.booking_id, new_time)?;

        info!(id = %booking.booking_id, from = %booking.booking_time, to = %new_time, "Booking amended");
        Ok(BookingResponse {
            booking_id: booking.booking_id,
        })
    }

    pub fn delete_booking(&self, name: &str) -> Result<(), BookingError> {
        let _gate = self.lock_writes()?;
        let booking = self.booking_by_name(name)?;
        self.backend.remove_booking(booking.booking_id)?;

        info!(id = %booking.booking_id, name = %booking.name, "Booking deleted");
        Ok(())
    }

    fn lock_writes(&self) -> Result<MutexGuard<'_, ()>, StoreError> {
        self.write_gate.lock().map_err(|_| StoreError::LockPoisoned)
    }
}
