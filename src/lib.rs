pub mod calendar;
pub mod config;
pub mod error;
pub mod holidays;
pub mod optimizer;
pub mod output;
pub mod server;

pub use calendar::{build_calendar, Calendar, DayType, WorkWeek};
pub use error::OptimizeError;
pub use optimizer::{find_vacation_clusters, optimize, optimize_vacation, VacationOption};
