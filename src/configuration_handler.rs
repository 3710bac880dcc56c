use crate::{
    configuration::Configuration,
    error::ConfigError,
    schedule::{SchedulePolicy, DEFAULT_CAPACITY},
    validation::parse_booking_time,
};
use chrono::NaiveTime;
use clap::Parser;

/// Appointment slot booking service
#[derive(Parser, Debug, Clone)]
#[command(name = "slot_booking", version)]
pub struct ConfigurationHandler {
    /// Port of the HTTP server
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// PostgreSQL URL. Bookings are kept in memory when omitted
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Start of the first slot
    #[arg(long, env = "BOOKING_OPENING_TIME", default_value = "09:00", value_parser = parse_clock_time)]
    opening_time: NaiveTime,

    /// End of the last slot
    #[arg(long, env = "BOOKING_CLOSING_TIME", default_value = "17:00", value_parser = parse_clock_time)]
    closing_time: NaiveTime,

    /// Hours that can't be booked, e.g. a lunch break
    #[arg(
        long,
        env = "BOOKING_EXCLUDED_HOURS",
        default_value = "12:00",
        value_delimiter = ',',
        value_parser = parse_clock_time
    )]
    excluded_hours: Vec<NaiveTime>,

    /// Maximum number of bookings per slot
    #[arg(long, env = "BOOKING_CAPACITY", default_value_t = DEFAULT_CAPACITY)]
    capacity: usize,

    /// Don't seed the in-memory store with example bookings
    #[arg(long, env = "BOOKING_SKIP_EXAMPLES")]
    skip_examples: bool,

    /// Require this key in the `x-api-key` header of every request
    #[arg(long, env = "BOOKING_API_KEY")]
    api_key: Option<String>,
}

impl ConfigurationHandler {
    pub fn parse_arguments() -> Self {
        dotenvy::dotenv().ok();
        Self::parse()
    }
}

fn parse_clock_time(value: &str) -> Result<NaiveTime, String> {
    parse_booking_time(value).ok_or_else(|| format!("`{value}` is not a time of day (HH:MM)"))
}

impl Configuration for ConfigurationHandler {
    fn port(&self) -> u16 {
        self.port
    }

    fn database_url(&self) -> Option<String> {
        self.database_url.clone()
    }

    fn schedule_policy(&self) -> Result<SchedulePolicy, ConfigError> {
        SchedulePolicy::new(
            self.opening_time,
            self.closing_time,
            self.excluded_hours.clone(),
            self.capacity,
        )
    }

    fn seed_examples(&self) -> bool {
        !self.skip_examples
    }

    fn api_key(&self) -> Option<String> {
        self.api_key.clone()
    }
}
