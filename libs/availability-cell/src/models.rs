// libs/availability-cell/src/models.rs
use chrono::{NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ==============================================================================
// AVAILABILITY MODELS
// ==============================================================================

/// Day of week keyed the way the scheduling tables are: 0 = Sunday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayOfWeek {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl DayOfWeek {
    pub fn from_weekday(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Sun => DayOfWeek::Sunday,
            Weekday::Mon => DayOfWeek::Monday,
            Weekday::Tue => DayOfWeek::Tuesday,
            Weekday::Wed => DayOfWeek::Wednesday,
            Weekday::Thu => DayOfWeek::Thursday,
            Weekday::Fri => DayOfWeek::Friday,
            Weekday::Sat => DayOfWeek::Saturday,
        }
    }

    pub fn as_index(&self) -> i32 {
        match self {
            DayOfWeek::Sunday => 0,
            DayOfWeek::Monday => 1,
            DayOfWeek::Tuesday => 2,
            DayOfWeek::Wednesday => 3,
            DayOfWeek::Thursday => 4,
            DayOfWeek::Friday => 5,
            DayOfWeek::Saturday => 6,
        }
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DayOfWeek::Sunday => "sunday",
            DayOfWeek::Monday => "monday",
            DayOfWeek::Tuesday => "tuesday",
            DayOfWeek::Wednesday => "wednesday",
            DayOfWeek::Thursday => "thursday",
            DayOfWeek::Friday => "friday",
            DayOfWeek::Saturday => "saturday",
        };
        write!(f, "{}", name)
    }
}

/// Default working window for one day of the weekly template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayHours {
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub available: bool,
}

/// Weekly working-hours template. One entry per weekday, always all seven,
/// so lookups can never miss a day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyHours {
    pub sunday: DayHours,
    pub monday: DayHours,
    pub tuesday: DayHours,
    pub wednesday: DayHours,
    pub thursday: DayHours,
    pub friday: DayHours,
    pub saturday: DayHours,
}

impl WeeklyHours {
    pub fn for_day(&self, day: DayOfWeek) -> &DayHours {
        match day {
            DayOfWeek::Sunday => &self.sunday,
            DayOfWeek::Monday => &self.monday,
            DayOfWeek::Tuesday => &self.tuesday,
            DayOfWeek::Wednesday => &self.wednesday,
            DayOfWeek::Thursday => &self.thursday,
            DayOfWeek::Friday => &self.friday,
            DayOfWeek::Saturday => &self.saturday,
        }
    }
}

/// Exception layered on top of the weekly template. A block with
/// `is_available = false` carves unavailability out of working hours
/// (lunch, admin time); a block with `is_available = true` opens a window
/// outside them (an evening clinic, a one-off Saturday).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeBlock {
    pub day: DayOfWeek,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_available: bool,
}

/// A doctor's full availability picture: weekly template plus ordered
/// override blocks. Block order matters — the first matching block wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityProfile {
    pub doctor_id: Uuid,
    pub working_hours: WeeklyHours,
    pub time_blocks: Vec<TimeBlock>,
    pub updated_at: NaiveDateTime,
}

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertAvailabilityRequest {
    pub working_hours: WeeklyHours,
    pub time_blocks: Vec<TimeBlock>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BookabilityQuery {
    pub day: DayOfWeek,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, thiserror::Error)]
pub enum AvailabilityError {
    #[error("Availability profile not found")]
    NotFound,

    #[error("Validation error: {0}")]
    Validation(String),
}
