use crate::schema::bookings;
use crate::types::Booking;
use crate::{backend::BookingBackend, error::StoreError};
use chrono::NaiveTime;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sql_types::Text;
use diesel::ConnectionError;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;
use uuid::Uuid;

diesel::define_sql_function!(fn lower(x: Text) -> Text);

#[derive(Queryable, Selectable, Insertable)]
#[diesel(table_name = bookings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
struct BookingRow {
    id: Uuid,
    time: NaiveTime,
    name: String,
}

impl From<BookingRow> for Booking {
    fn from(row: BookingRow) -> Self {
        Booking {
            booking_id: row.id,
            booking_time: row.time,
            name: row.name,
        }
    }
}

impl From<&Booking> for BookingRow {
    fn from(booking: &Booking) -> Self {
        BookingRow {
            id: booking.booking_id,
            time: booking.booking_time,
            name: booking.name.clone(),
        }
    }
}

/// PostgreSQL backed store. All queries share one connection.
#[derive(Clone)]
pub struct DatabaseInterface {
    connection: Arc<Mutex<PgConnection>>,
}

impl DatabaseInterface {
    pub fn new(database_url: &str) -> Result<Self, ConnectionError> {
        let connection = PgConnection::establish(database_url)?;
        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    fn connection(&self) -> Result<MutexGuard<'_, PgConnection>, StoreError> {
        self.connection.lock().map_err(|_| StoreError::LockPoisoned)
    }

    #[cfg(test)]
    fn remove_all_bookings(&self) -> Result<(), StoreError> {
        diesel::delete(bookings::table).execute(&mut *self.connection()?)?;
        Ok(())
    }
}

impl BookingBackend for DatabaseInterface {
    fn bookings(&self) -> Result<Vec<Booking>, StoreError> {
        let rows: Vec<BookingRow> = bookings::table
            .order((bookings::time.asc(), bookings::name.asc()))
            .select(BookingRow::as_select())
            .load(&mut *self.connection()?)?;
        Ok(rows.into_iter().map(Booking::from).collect())
    }

    fn booking_by_name(&self, booker_name: &str) -> Result<Option<Booking>, StoreError> {
        let row: Option<BookingRow> = bookings::table
            .filter(lower(bookings::name).eq(lower(booker_name)))
            .select(BookingRow::as_select())
            .first(&mut *self.connection()?)
            .optional()?;
        Ok(row.map(Booking::from))
    }

    fn count_at(&self, slot_time: NaiveTime, excluding: Option<Uuid>) -> Result<usize, StoreError> {
        let at_slot = bookings::table.filter(bookings::time.eq(slot_time));
        let mut connection = self.connection()?;

        let count: i64 = match excluding {
            Some(excluded_id) => at_slot
                .filter(bookings::id.ne(excluded_id))
                .count()
                .get_result(&mut *connection)?,
            None => at_slot.count().get_result(&mut *connection)?,
        };
        Ok(usize::try_from(count).unwrap_or_default())
    }

    fn insert_booking(&self, booking: &Booking) -> Result<(), StoreError> {
        debug!(id = %booking.booking_id, "Inserting booking");
        diesel::insert_into(bookings::table)
            .values(BookingRow::from(booking))
            .execute(&mut *self.connection()?)
            .map_err(|err| match err {
                // bookings_lower_name_idx
                DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                    StoreError::NameTaken(booking.name.clone())
                }
                err => StoreError::Database(err),
            })?;
        Ok(())
    }

    fn update_booking_time(&self, booking_id: Uuid, new_time: NaiveTime) -> Result<(), StoreError> {
        let changed = diesel::update(bookings::table.find(booking_id))
            .set(bookings::time.eq(new_time))
            .execute(&mut *self.connection()?)?;
        if changed == 0 {
            return Err(StoreError::MissingBooking(booking_id));
        }
        Ok(())
    }

    fn remove_booking(&self, booking_id: Uuid) -> Result<(), StoreError> {
        let removed =
            diesel::delete(bookings::table.find(booking_id)).execute(&mut *self.connection()?)?;
        if removed == 0 {
            return Err(StoreError::MissingBooking(booking_id));
        }
        Ok(())
    }
}
