//! Domain types for the observation service.
//!
//! Station ids are validated at construction time; records carry the
//! feed's values as strings with sentinels already substituted, so code
//! that receives them never has to deal with missing fields.

mod record;
mod station;
mod time;

pub use record::{DailyRecord, HourlyRecord, LatestRecord, Sentinels};
pub use station::{InvalidStationId, StationId};
pub use time::{
    DEFAULT_DATE_FORMAT, DateFormatError, TimeError, format_display_date, format_query_time,
    parse_feed_time, validate_date_format,
};
