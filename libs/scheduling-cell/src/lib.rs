pub mod handlers;
pub mod models;
pub mod notifications;
pub mod router;
pub mod services;
pub mod store;

// Re-export the core scheduling types for other cells
pub use models::{
    Appointment, AppointmentKind, AppointmentStatus, Occurrence, ParticipantRole,
    RecurrencePattern, RecurrenceRule, SchedulingError, Slot,
};
pub use notifications::{Notification, NotificationKind, NotificationSink, TracingNotificationSink};
pub use store::{AppointmentPatch, AppointmentRepository, InMemoryAppointmentStore, NewAppointment};
