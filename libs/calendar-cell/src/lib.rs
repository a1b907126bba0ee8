pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{
    AgendaDay, AgendaView, AppointmentLayout, CalendarError, DayColumn, MonthCell,
    RelocationDelta, SlotGroup, DAY_VIEW_STEP_MINUTES, GRID_END_HOUR, GRID_START_HOUR,
    MONTH_CELL_VISIBLE_CAP, WEEK_VIEW_STEP_MINUTES,
};
pub use services::projector;
