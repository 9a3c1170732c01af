//! Text for the stoppage info panel.

use std::fmt;

use chrono::{Local, TimeZone};
use serde::Serialize;

use crate::models::Stoppage;

const DATE_TIME_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoppageDetails {
    pub reach_time: String,
    pub end_time: String,
    pub duration: String,
}

impl fmt::Display for StoppageDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Reach Time: {}", self.reach_time)?;
        writeln!(f, "End Time: {}", self.end_time)?;
        write!(f, "Stoppage Duration: {}", self.duration)
    }
}

pub fn describe<Tz>(stoppage: &Stoppage, tz: &Tz) -> StoppageDetails
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    StoppageDetails {
        reach_time: format_timestamp(stoppage.start_time, tz),
        end_time: format_timestamp(stoppage.end_time, tz),
        duration: format!("{:.2} minutes", stoppage.duration_minutes()),
    }
}

/// Details rendered in the machine's local time zone.
pub fn describe_local(stoppage: &Stoppage) -> StoppageDetails {
    describe(stoppage, &Local)
}

pub fn format_timestamp<Tz>(millis: i64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    match tz.timestamp_millis_opt(millis).single() {
        Some(at) => at.format(DATE_TIME_FORMAT).to_string(),
        None => "Invalid Date".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GeoCoord;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn formats_panel_fields() {
        // 2024-03-05 14:07:09 UTC
        let start = 1_709_647_629_000;
        let stoppage = Stoppage::new(GeoCoord::new(0.0, 0.0), start, start + 383_000);
        let details = describe(&stoppage, &Utc);

        assert_eq!(details.reach_time, "3/5/2024, 2:07:09 PM");
        assert_eq!(details.end_time, "3/5/2024, 2:13:32 PM");
        assert_eq!(details.duration, "6.38 minutes");
    }

    #[test]
    fn respects_time_zone() {
        let ist = FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
        assert_eq!(format_timestamp(0, &ist), "1/1/1970, 5:30:00 AM");
    }

    #[test]
    fn display_lists_all_three_lines() {
        let stoppage = Stoppage::new(GeoCoord::new(0.0, 0.0), 0, 600_000);
        let text = describe(&stoppage, &Utc).to_string();

        assert_eq!(
            text,
            "Reach Time: 1/1/1970, 12:00:00 AM\nEnd Time: 1/1/1970, 12:10:00 AM\nStoppage Duration: 10.00 minutes"
        );
    }
}
