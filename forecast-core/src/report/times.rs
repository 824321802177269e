use chrono::{DateTime, Utc};

use super::{Alert, Currently, DataBlock, DayData, HourData, MinuteData, Report};

/// Fill structured time fields from their raw Unix-second counterparts.
///
/// Implementations only ever read the paired raw field, so running it more
/// than once is harmless.
pub trait NormalizeTimes {
    fn normalize_times(&mut self);
}

/// Seconds since the Unix epoch as a UTC instant. `None` when out of chrono's range.
pub fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}

fn optional(ts: Option<i64>) -> Option<DateTime<Utc>> {
    ts.and_then(unix_to_utc)
}

impl Report {
    /// Populate every structured time in the report, in UTC.
    pub fn normalize_times(&mut self) {
        if let Some(currently) = &mut self.currently {
            currently.normalize_times();
        }
        if let Some(minutely) = &mut self.minutely {
            minutely.normalize_times();
        }
        if let Some(hourly) = &mut self.hourly {
            hourly.normalize_times();
        }
        if let Some(daily) = &mut self.daily {
            daily.normalize_times();
        }
        for alert in self.alerts.iter_mut().flatten() {
            alert.normalize_times();
        }
    }
}

impl<T: NormalizeTimes> NormalizeTimes for DataBlock<T> {
    fn normalize_times(&mut self) {
        self.data.iter_mut().for_each(T::normalize_times);
    }
}

impl NormalizeTimes for Currently {
    fn normalize_times(&mut self) {
        self.time = unix_to_utc(self.time_unix);
    }
}

impl NormalizeTimes for MinuteData {
    fn normalize_times(&mut self) {
        self.time = unix_to_utc(self.time_unix);
    }
}

impl NormalizeTimes for HourData {
    fn normalize_times(&mut self) {
        self.time = unix_to_utc(self.time_unix);
    }
}

impl NormalizeTimes for DayData {
    fn normalize_times(&mut self) {
        self.time = unix_to_utc(self.time_unix);
        self.sunrise = optional(self.sunrise_unix);
        self.sunset = optional(self.sunset_unix);
        self.precip_intensity_max_time = optional(self.precip_intensity_max_time_unix);
        self.temperature_min_time = optional(self.temperature_min_time_unix);
        self.temperature_max_time = optional(self.temperature_max_time_unix);
        self.apparent_temperature_min_time = optional(self.apparent_temperature_min_time_unix);
        self.apparent_temperature_max_time = optional(self.apparent_temperature_max_time_unix);
    }
}

impl NormalizeTimes for Alert {
    fn normalize_times(&mut self) {
        self.expires = unix_to_utc(self.expires_unix);
    }
}
