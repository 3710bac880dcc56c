use crate::{
    backend::BookingBackend, configuration::Configuration, error::ConfigError, error::StoreError,
    http::create_app, schedule::SchedulePolicy, types::Booking,
};
use chrono::NaiveTime;
use mockall::mock;
use tokio::{net::TcpListener, task::JoinHandle};
use uuid::Uuid;

mock! {
    pub Backend {}

    impl Clone for Backend {
        fn clone(&self) -> Self;
    }

    impl BookingBackend for Backend {
        fn bookings(&self) -> Result<Vec<Booking>, StoreError>;
        fn booking_by_name(&self, name: &str) -> Result<Option<Booking>, StoreError>;
        fn count_at(&self, time: NaiveTime, excluding: Option<Uuid>) -> Result<usize, StoreError>;
        fn insert_booking(&self, booking: &Booking) -> Result<(), StoreError>;
        fn update_booking_time(&self, id: Uuid, time: NaiveTime) -> Result<(), StoreError>;
        fn remove_booking(&self, id: Uuid) -> Result<(), StoreError>;
    }
}

/// A mock whose every clone fails to list bookings with `error()`.
pub fn failing_backend(error: fn() -> StoreError) -> MockBackend {
    let mut backend = MockBackend::new();
    backend.expect_bookings().returning(move || Err(error()));
    backend
        .expect_clone()
        .returning(move || failing_backend(error));
    backend
}

/// A mock whose every clone passes the service checks on create, then
/// reports the name as already stored.
pub fn name_taken_backend() -> MockBackend {
    let mut backend = MockBackend::new();
    backend.expect_booking_by_name().returning(|_| Ok(None));
    backend.expect_count_at().returning(|_, _| Ok(0));
    backend
        .expect_insert_booking()
        .returning(|booking| Err(StoreError::NameTaken(booking.name.clone())));
    backend.expect_clone().returning(name_taken_backend);
    backend
}

#[derive(Clone, Default)]
pub struct TestConfiguration {
    pub policy: SchedulePolicy,
    pub api_key: Option<String>,
}

impl Configuration for TestConfiguration {
    fn port(&self) -> u16 {
        0
    }

    fn database_url(&self) -> Option<String> {
        None
    }

    fn schedule_policy(&self) -> Result<SchedulePolicy, ConfigError> {
        Ok(self.policy.clone())
    }

    fn seed_examples(&self) -> bool {
        false
    }

    fn api_key(&self) -> Option<String> {
        self.api_key.clone()
    }
}

/// Serves the app on an ephemeral port and returns its base URL.
pub async fn spawn_server<B: BookingBackend>(
    backend: B,
    configuration: TestConfiguration,
) -> (JoinHandle<()>, String) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = format!("http://{}", listener.local_addr().unwrap());
    let app = create_app(backend, configuration).unwrap();

    let server = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (server, address)
}
