//! UTC day-boundary detection for segmented logs.

use chrono::{DateTime, Timelike, Utc};

/// Whether `now` falls within five minutes of UTC midnight.
///
/// Environment logs are segmented per UTC day; the window is widened to
/// five minutes on either side to absorb clock skew between client and
/// log producer.
pub fn within_utc_midnight_window(now: DateTime<Utc>) -> bool {
    let hour = now.hour();
    let minute = now.minute();
    (hour == 23 && minute >= 55) || (hour == 0 && minute <= 5)
}
