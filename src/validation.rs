use crate::error::BookingError;
use crate::schedule::SchedulePolicy;
use crate::types::BookingRequest;
use chrono::NaiveTime;
use std::borrow::Cow;
use validator::{ValidateArgs, ValidationError, ValidationErrors};

pub const MAX_NAME_LENGTH: usize = 100;

const TIME_FORMATS: [&str; 4] = ["%H:%M", "%H:%M:%S", "%I:%M %p", "%I:%M:%S %p"];

pub fn parse_booking_time(booking_time: &str) -> Option<NaiveTime> {
    let booking_time = booking_time.trim();
    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(booking_time, format).ok())
}

pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(invalid("name_required", "Name is required".into()));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(invalid(
            "name_too_long",
            format!("Name must not exceed {MAX_NAME_LENGTH} characters").into(),
        ));
    }
    Ok(())
}

pub fn validate_booking_time(
    booking_time: &str,
    policy: &SchedulePolicy,
) -> Result<(), ValidationError> {
    if booking_time.trim().is_empty() {
        return Err(invalid(
            "booking_time_required",
            "Booking time is required".into(),
        ));
    }
    match parse_booking_time(booking_time) {
        Some(time) if policy.is_bookable(time) => Ok(()),
        _ => Err(invalid("booking_time_outside_schedule", window_message(policy).into())),
    }
}

/// Validates `request` against the schedule and returns the parsed start
/// time. Every violated rule is reported, not just the first one.
pub fn validate_request(
    request: &BookingRequest,
    policy: &SchedulePolicy,
) -> Result<NaiveTime, BookingError> {
    request
        .validate_with_args(policy)
        .map_err(|errors| BookingError::Validation(error_messages(&errors)))?;

    parse_booking_time(&request.booking_time)
        .ok_or_else(|| BookingError::Validation(vec![window_message(policy)]))
}

fn invalid(code: &'static str, message: Cow<'static, str>) -> ValidationError {
    ValidationError::new(code).with_message(message)
}

fn window_message(policy: &SchedulePolicy) -> String {
    let last_start = policy
        .last_slot_start()
        .unwrap_or(policy.opening_time)
        .format("%H:%M");
    let mut message = format!(
        "Booking time must be on the hour between {} and {last_start}",
        policy.opening_time.format("%H:%M"),
    );
    if !policy.excluded_hours.is_empty() {
        let excluded: Vec<String> = policy
            .excluded_hours
            .iter()
            .map(|time| time.format("%H:%M").to_string())
            .collect();
        message.push_str(&format!(", excluding {}", excluded.join(", ")));
    }
    message.push('.');
    message
}

fn error_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(_, field_errors)| field_errors.iter())
        .map(|error| match &error.message {
            Some(message) => message.to_string(),
            None => error.code.to_string(),
        })
        .collect()
}
