//! Time-of-day greeting for the dashboard header.

use chrono::{NaiveTime, Timelike};

const MORNING_START: u32 = 6 * 60;
const NOON: u32 = 12 * 60;
const EVENING_START: u32 = 19 * 60;

/// Boundaries are exclusive at minute resolution: 06:00, 12:00 and 19:00
/// themselves fall through to "Working Late?".
pub fn greeting(time: NaiveTime) -> &'static str {
    let minute_of_day = time.hour() * 60 + time.minute();
    if minute_of_day > MORNING_START && minute_of_day < NOON {
        "Good Morning!"
    } else if minute_of_day > NOON && minute_of_day < EVENING_START {
        "Good Afternoon"
    } else {
        "Working Late?"
    }
}
