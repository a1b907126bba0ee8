pub mod handlers;
pub mod models;
pub mod router;
pub mod services;
pub mod store;

// Re-export the types other cells work with
pub use models::{
    AvailabilityError, AvailabilityProfile, DayHours, DayOfWeek, TimeBlock, WeeklyHours,
};
pub use services::availability::AvailabilityService;
pub use store::{AvailabilityRepository, InMemoryAvailabilityStore};
