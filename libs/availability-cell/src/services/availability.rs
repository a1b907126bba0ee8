// libs/availability-cell/src/services/availability.rs

use std::sync::Arc;

use chrono::{NaiveTime, Utc};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::{
    AvailabilityError, AvailabilityProfile, DayOfWeek, TimeBlock, UpsertAvailabilityRequest,
    WeeklyHours,
};
use crate::store::AvailabilityRepository;

pub struct AvailabilityService {
    store: Arc<dyn AvailabilityRepository>,
}

impl AvailabilityService {
    pub fn new(store: Arc<dyn AvailabilityRepository>) -> Self {
        Self { store }
    }

    /// Fetch a doctor's availability profile.
    pub async fn get_profile(
        &self,
        doctor_id: Uuid,
    ) -> Result<AvailabilityProfile, AvailabilityError> {
        debug!("Fetching availability profile for doctor {}", doctor_id);
        self.store.get(doctor_id).await
    }

    /// Create or replace a doctor's availability profile.
    pub async fn upsert_profile(
        &self,
        doctor_id: Uuid,
        request: UpsertAvailabilityRequest,
    ) -> Result<AvailabilityProfile, AvailabilityError> {
        debug!("Upserting availability profile for doctor {}", doctor_id);

        validate_weekly_hours(&request.working_hours)?;
        validate_time_blocks(&request.time_blocks)?;

        let profile = AvailabilityProfile {
            doctor_id,
            working_hours: request.working_hours,
            time_blocks: request.time_blocks,
            updated_at: Utc::now().naive_utc(),
        };

        Ok(self.store.upsert(profile).await)
    }

    /// Answer "is [day, start, end) bookable?" for a doctor. A doctor with
    /// no registered profile is bookable at any time.
    pub async fn is_window_bookable(
        &self,
        doctor_id: Uuid,
        day: DayOfWeek,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> bool {
        match self.store.find(doctor_id).await {
            Some(profile) => is_bookable(&profile, day, start_time, end_time),
            None => {
                debug!("No availability profile for doctor {}, treating as open", doctor_id);
                true
            }
        }
    }
}

/// Resolve a requested window against the weekly template and the override
/// blocks.
///
/// Resolution order: a day marked unavailable is closed outright; otherwise
/// the first block (in list order) overlapping the window decides with its
/// own `is_available` flag — a block can both revoke availability inside
/// working hours and grant it outside them; only when no block matches must
/// the window sit fully inside the day's working hours.
pub fn is_bookable(
    profile: &AvailabilityProfile,
    day: DayOfWeek,
    start_time: NaiveTime,
    end_time: NaiveTime,
) -> bool {
    let day_hours = profile.working_hours.for_day(day);
    if !day_hours.available {
        return false;
    }

    for block in profile.time_blocks.iter().filter(|block| block.day == day) {
        // Half-open overlap on same-day windows
        if start_time < block.end_time && block.start_time < end_time {
            return block.is_available;
        }
    }

    start_time >= day_hours.start && end_time <= day_hours.end
}

fn validate_weekly_hours(hours: &WeeklyHours) -> Result<(), AvailabilityError> {
    let days = [
        (DayOfWeek::Sunday, &hours.sunday),
        (DayOfWeek::Monday, &hours.monday),
        (DayOfWeek::Tuesday, &hours.tuesday),
        (DayOfWeek::Wednesday, &hours.wednesday),
        (DayOfWeek::Thursday, &hours.thursday),
        (DayOfWeek::Friday, &hours.friday),
        (DayOfWeek::Saturday, &hours.saturday),
    ];

    for (day, day_hours) in days {
        if day_hours.start >= day_hours.end {
            warn!("Rejecting working hours for {}: start not before end", day);
            return Err(AvailabilityError::Validation(format!(
                "Working hours for {} must start before they end",
                day
            )));
        }
    }

    Ok(())
}

fn validate_time_blocks(blocks: &[TimeBlock]) -> Result<(), AvailabilityError> {
    for block in blocks {
        if block.start_time >= block.end_time {
            return Err(AvailabilityError::Validation(format!(
                "Time block on {} must start before it ends",
                block.day
            )));
        }
    }

    Ok(())
}
