pub mod scheduler;
pub mod time;
pub mod units;

pub use scheduler::{EventId, EventQueue, Scheduler};
pub use time::SimTime;
pub use units::{format_delay, parse_delay, DataRate, UnitParseError};
