pub mod aggregate;
pub mod annotate;
pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod fixtures;
pub mod http_client;
pub mod locale;
pub mod logging;
pub mod schedule;
pub mod timestamp;
pub mod window;

pub use aggregate::SlotAggregator;
pub use annotate::{MatchRecord, MatchTimeAnnotator, TimeAnnotation};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{DisplayFormat, EngineConfig};
pub use engine::{DateStyle, PreferencesUpdate, TimeEngine, UpcomingDay, UserPreferences};
pub use error::TimeError;
pub use schedule::WeeklyScheduleTable;
pub use timestamp::{IntoMatchTime, MatchTime};
pub use window::{SlotCategory, TimeWindow, WindowRecord};
