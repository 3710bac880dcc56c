use crate::{error::ConfigError, schedule::SchedulePolicy};

pub trait Configuration: Clone + Send + Sync + 'static {
    fn port(&self) -> u16;
    fn database_url(&self) -> Option<String>;
    fn schedule_policy(&self) -> Result<SchedulePolicy, ConfigError>;
    fn seed_examples(&self) -> bool;
    /// When set, every request must carry this value in `x-api-key`.
    fn api_key(&self) -> Option<String>;
}
