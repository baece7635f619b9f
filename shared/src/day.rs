use chrono::{DateTime, Days, FixedOffset, NaiveDate, Offset, TimeZone, Utc};

/// Local calendar used to decide where one reward day ends and the next begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayBoundary {
    offset: FixedOffset,
}

impl Default for DayBoundary {
    fn default() -> Self {
        Self::utc()
    }
}

impl DayBoundary {
    pub fn utc() -> Self {
        Self { offset: Utc.fix() }
    }

    /// Returns `None` if the offset is a day or more away from UTC.
    pub fn from_offset_minutes(minutes: i32) -> Option<Self> {
        FixedOffset::east_opt(minutes.checked_mul(60)?).map(|offset| Self { offset })
    }

    pub fn day_of(&self, time: DateTime<Utc>) -> NaiveDate {
        time.with_timezone(&self.offset).date_naive()
    }

    /// The most recent day that has fully elapsed at `now`.
    pub fn last_completed_day(&self, now: DateTime<Utc>) -> Option<NaiveDate> {
        self.day_of(now).checked_sub_days(Days::new(1))
    }

    /// Local midnight at the start of `day`, in UTC.
    pub fn start_of(&self, day: NaiveDate) -> Option<DateTime<Utc>> {
        let midnight = day.and_hms_opt(0, 0, 0)?;
        self.offset
            .from_local_datetime(&midnight)
            .single()
            .map(|time| time.with_timezone(&Utc))
    }

    /// Half-open `[start, end)` window covering `day`.
    pub fn window(&self, day: NaiveDate) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        self.span(day, day)
    }

    /// Half-open window from the start of `first` to the end of `last`.
    /// `None` when `first` is after `last`.
    pub fn span(
        &self,
        first: NaiveDate,
        last: NaiveDate,
    ) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        if first > last {
            return None;
        }
        let next = last.checked_add_days(Days::new(1))?;
        Some((self.start_of(first)?, self.start_of(next)?))
    }
}
