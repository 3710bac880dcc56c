use crate::error::ConfigError;
use crate::types::{Booking, TimeSlot};
use chrono::{Duration, NaiveTime, Timelike};

pub const SLOT_LENGTH_HOURS: i64 = 1;
pub const DEFAULT_CAPACITY: usize = 4;

/// Opening hours, lunch break and per-slot capacity of the daily schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulePolicy {
    pub opening_time: NaiveTime,
    pub closing_time: NaiveTime,
    pub excluded_hours: Vec<NaiveTime>,
    pub capacity: usize,
}

impl Default for SchedulePolicy {
    fn default() -> Self {
        Self {
            opening_time: hour(9),
            closing_time: hour(17),
            excluded_hours: vec![hour(12)],
            capacity: DEFAULT_CAPACITY,
        }
    }
}

impl SchedulePolicy {
    pub fn new(
        opening_time: NaiveTime,
        closing_time: NaiveTime,
        excluded_hours: Vec<NaiveTime>,
        capacity: usize,
    ) -> Result<Self, ConfigError> {
        if opening_time >= closing_time {
            return Err(ConfigError::EmptySchedule {
                opening: opening_time,
                closing: closing_time,
            });
        }
        if capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if let Some(off_hour) = excluded_hours.iter().find(|time| !is_on_the_hour(**time)) {
            return Err(ConfigError::ExcludedHourOffTheHour(*off_hour));
        }

        Ok(Self {
            opening_time,
            closing_time,
            excluded_hours,
            capacity,
        })
    }

    pub fn slot_length() -> Duration {
        Duration::hours(SLOT_LENGTH_HOURS)
    }

    /// Start of the last slot that still ends by closing time, if any.
    pub fn last_slot_start(&self) -> Option<NaiveTime> {
        match self.closing_time.overflowing_sub_signed(Self::slot_length()) {
            (last, 0) => Some(last),
            _ => None,
        }
    }

    pub fn is_excluded(&self, time: NaiveTime) -> bool {
        self.excluded_hours.contains(&time)
    }

    /// Whether a booking may start at `time`.
    pub fn is_bookable(&self, time: NaiveTime) -> bool {
        is_on_the_hour(time)
            && time >= self.opening_time
            && self.last_slot_start().is_some_and(|last| time <= last)
            && !self.is_excluded(time)
    }
}

pub fn is_on_the_hour(time: NaiveTime) -> bool {
    time.minute() == 0 && time.second() == 0 && time.nanosecond() == 0
}

/// Lists the day's slots and marks each one available while it has
/// fewer than `capacity` bookings.
pub fn list_slots(policy: &SchedulePolicy, bookings: &[Booking]) -> Vec<TimeSlot> {
    let mut slots = Vec::new();
    let mut start_time = policy.opening_time;

    while start_time < policy.closing_time {
        let (end_time, wrapped_seconds) =
            start_time.overflowing_add_signed(SchedulePolicy::slot_length());
        let booked = bookings
            .iter()
            .filter(|booking| booking.booking_time == start_time)
            .count();

        slots.push(TimeSlot {
            start_time,
            end_time,
            is_available: booked < policy.capacity,
        });

        // Past midnight
        if wrapped_seconds != 0 {
            break;
        }
        start_time = end_time;
    }
    slots
}

fn hour(hour: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or(NaiveTime::MIN)
}

#[cfg(test)]
mod test {
    use super::*;
    use uuid::Uuid;

    fn booking_at(name: &str, hour: u32) -> Booking {
        Booking {
            booking_id: Uuid::new_v4(),
            booking_time: NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
            name: name.into(),
        }
    }

    #[test]
    fn test_default_schedule_lists_eight_slots() {
        let slots = list_slots(&SchedulePolicy::default(), &[]);

        assert_eq!(slots.len(), 8);
        assert_eq!(slots[0].start_time, hour(9));
        assert_eq!(slots[0].end_time, hour(10));
        assert_eq!(slots[7].start_time, hour(16));
        assert_eq!(slots[7].end_time, hour(17));
        assert!(slots.iter().all(|slot| slot.is_available));
    }

    #[test]
    fn test_slot_unavailable_once_capacity_reached() {
        let policy = SchedulePolicy::default();
        let mut bookings: Vec<Booking> = (0..3)
            .map(|i| booking_at(&format!("Guest {i}"), 10))
            .collect();
        bookings.push(booking_at("Someone Else", 11));

        let slots = list_slots(&policy, &bookings);
        assert!(slots.iter().all(|slot| slot.is_available));

        bookings.push(booking_at("Fourth", 10));
        let slots = list_slots(&policy, &bookings);
        let unavailable: Vec<&TimeSlot> = slots.iter().filter(|slot| !slot.is_available).collect();
        assert_eq!(unavailable.len(), 1);
        assert_eq!(unavailable[0].start_time, hour(10));
    }

    #[test]
    fn test_slots_stop_at_midnight() {
        let policy = SchedulePolicy::new(
            hour(22),
            NaiveTime::from_hms_opt(23, 59, 0).unwrap(),
            vec![],
            1,
        )
        .unwrap();

        let slots = list_slots(&policy, &[]);
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[1].start_time, hour(23));
        assert_eq!(slots[1].end_time, NaiveTime::MIN);
    }

    #[test]
    fn test_invalid_policies_are_rejected() {
        assert_eq!(
            SchedulePolicy::new(hour(17), hour(9), vec![], 4),
            Err(ConfigError::EmptySchedule {
                opening: hour(17),
                closing: hour(9)
            })
        );
        assert_eq!(
            SchedulePolicy::new(hour(9), hour(17), vec![], 0),
            Err(ConfigError::ZeroCapacity)
        );

        let half_past = NaiveTime::from_hms_opt(12, 30, 0).unwrap();
        assert_eq!(
            SchedulePolicy::new(hour(9), hour(17), vec![half_past], 4),
            Err(ConfigError::ExcludedHourOffTheHour(half_past))
        );
    }

    #[test]
    fn test_last_slot_start_is_one_hour_before_closing() {
        let policy = SchedulePolicy::default();
        assert_eq!(policy.last_slot_start(), Some(hour(16)));
        assert!(policy.is_bookable(hour(16)));
        assert!(!policy.is_bookable(hour(17)));
        assert!(!policy.is_bookable(hour(12)));

        let short_night = SchedulePolicy::new(
            NaiveTime::MIN,
            NaiveTime::from_hms_opt(0, 30, 0).unwrap(),
            vec![],
            4,
        )
        .unwrap();
        assert_eq!(short_night.last_slot_start(), None);
        assert!(!short_night.is_bookable(NaiveTime::MIN));
    }
}
