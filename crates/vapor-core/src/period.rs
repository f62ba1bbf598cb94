//! # Period Module
//!
//! Resolves calendar filters into concrete UTC instants.
//!
//! ## Two Kinds of Window
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  DayWindow    GET /bills?date=2024-03-15                                │
//! │  ─────────                                                              │
//! │     local 2024-03-15 00:00:00.000 ──► local 2024-03-15 23:59:59.999    │
//! │     both ends inclusive                                                 │
//! │                                                                         │
//! │  ReportWindow GET /reports?range=weekly                                 │
//! │  ────────────                                                           │
//! │     now - 7 days, truncated to local midnight ──► now                   │
//! │     scan is created_at >= start                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every function takes the time zone as a parameter. The server passes
//! `chrono::Local`; tests pass `Utc` or a fixed offset so results don't
//! depend on the machine running them.

use chrono::{
    DateTime, Days, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime, SubsecRound, TimeZone,
    Utc,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::validation::ValidationResult;

// =============================================================================
// Timestamps
// =============================================================================

/// Drops sub-millisecond precision.
///
/// Stored timestamps keep milliseconds only, so the 23:59:59.999 boundary
/// compares the same way in memory and in SQLite.
#[inline]
pub fn truncate_to_millis(at: DateTime<Utc>) -> DateTime<Utc> {
    at.trunc_subsecs(3)
}

/// Resolves a local wall-clock time to UTC.
///
/// Ambiguous times (DST fall-back) take the earlier instant. Times inside a
/// DST gap move forward an hour; if that still fails the wall clock is read
/// as UTC.
fn resolve_local<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> DateTime<Utc> {
    tz.from_local_datetime(&naive)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(naive + Duration::hours(1))).earliest())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&naive))
}

/// The first instant of `date` in `tz`.
pub fn local_midnight<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> DateTime<Utc> {
    resolve_local(tz, date.and_time(NaiveTime::MIN))
}

// =============================================================================
// Day Window
// =============================================================================

/// One calendar day in some time zone, as an inclusive UTC range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    /// 00:00:00.000 local.
    pub start: DateTime<Utc>,
    /// 23:59:59.999 local.
    pub end: DateTime<Utc>,
}

impl DayWindow {
    /// Builds the window for `date` in `tz`.
    ///
    /// ```rust
    /// use chrono::{NaiveDate, Utc};
    /// use vapor_core::period::DayWindow;
    ///
    /// let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
    /// let window = DayWindow::for_date(date, &Utc);
    ///
    /// assert_eq!(window.start.to_rfc3339(), "2024-03-15T00:00:00+00:00");
    /// assert_eq!(window.end.to_rfc3339(), "2024-03-15T23:59:59.999+00:00");
    /// ```
    pub fn for_date<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> Self {
        let start = local_midnight(date, tz);
        // One millisecond before the next local midnight, so 23-hour and
        // 25-hour DST days come out right.
        let end = match date.succ_opt() {
            Some(next) => local_midnight(next, tz) - Duration::milliseconds(1),
            None => start + Duration::days(1) - Duration::milliseconds(1),
        };
        DayWindow { start, end }
    }
}

/// Parses a `YYYY-MM-DD` query value.
///
/// ```rust
/// use vapor_core::period::parse_date;
///
/// assert!(parse_date("2024-02-29").is_ok());
/// assert!(parse_date("2023-02-29").is_err());
/// assert!(parse_date("15/03/2024").is_err());
/// ```
pub fn parse_date(value: &str) -> ValidationResult<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::required("date"));
    }
    // %Y also accepts signed and short years; insist on the canonical shape
    if value.len() != 10 {
        return Err(ValidationError::invalid_format("date", "expected YYYY-MM-DD"));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| ValidationError::invalid_format("date", "expected YYYY-MM-DD"))
}

// =============================================================================
// Report Range
// =============================================================================

/// Named reporting window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportRange {
    #[default]
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl ReportRange {
    pub const ALL: [ReportRange; 4] = [
        ReportRange::Daily,
        ReportRange::Weekly,
        ReportRange::Monthly,
        ReportRange::Yearly,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            ReportRange::Daily => "daily",
            ReportRange::Weekly => "weekly",
            ReportRange::Monthly => "monthly",
            ReportRange::Yearly => "yearly",
        }
    }

    /// Resolves the range against `now`.
    ///
    /// ## Window Rules
    /// ```text
    /// daily    today                 00:00 ──► now
    /// weekly   today - 7 days        00:00 ──► now
    /// monthly  today - 1 month       00:00 ──► now   (Mar 31 → Feb 29)
    /// yearly   today - 1 year        00:00 ──► now   (Feb 29 → Feb 28)
    /// ```
    ///
    /// Midnight truncation applies to every range, including the longer ones.
    ///
    /// Month and year steps clamp to the last day of the shorter month. A
    /// `Date.setMonth`-style rollover would instead land past it (Mar 31 minus
    /// a month → Mar 2, Feb 29 minus a year → Mar 1) and silently drop the
    /// first days of the window; that rollover is not reproduced.
    ///
    /// ```rust
    /// use chrono::{TimeZone, Utc};
    /// use vapor_core::period::ReportRange;
    ///
    /// let now = Utc.with_ymd_and_hms(2024, 3, 31, 14, 30, 0).unwrap();
    /// let window = ReportRange::Monthly.window(now);
    ///
    /// assert_eq!(window.start, Utc.with_ymd_and_hms(2024, 2, 29, 0, 0, 0).unwrap());
    /// assert_eq!(window.end, now);
    /// ```
    pub fn window<Tz: TimeZone>(&self, now: DateTime<Tz>) -> ReportWindow {
        let tz = now.timezone();
        let today = now.date_naive();

        let start_date = match self {
            ReportRange::Daily => Some(today),
            ReportRange::Weekly => today.checked_sub_days(Days::new(7)),
            ReportRange::Monthly => today.checked_sub_months(Months::new(1)),
            ReportRange::Yearly => today.checked_sub_months(Months::new(12)),
        }
        .unwrap_or(NaiveDate::MIN);

        ReportWindow {
            start: local_midnight(start_date, &tz),
            end: truncate_to_millis(now.with_timezone(&Utc)),
        }
    }
}

impl fmt::Display for ReportRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ReportRange {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReportRange::ALL
            .into_iter()
            .find(|r| r.as_str() == s.trim())
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "range".to_string(),
                allowed: ReportRange::ALL
                    .iter()
                    .map(|r| r.as_str().to_string())
                    .collect(),
            })
    }
}

/// A resolved report window. Bills are scanned from `start` onward; `end`
/// is the moment the report was computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_day_window_boundaries() {
        let window = DayWindow::for_date(date(2024, 3, 15), &Utc);

        let last_ms = utc(2024, 3, 15, 23, 59, 59) + Duration::milliseconds(999);
        let next_day = utc(2024, 3, 16, 0, 0, 0);

        assert_eq!(window.start, utc(2024, 3, 15, 0, 0, 0));
        assert_eq!(window.end, last_ms);
        assert_eq!(window.end + Duration::milliseconds(1), next_day);
    }

    #[test]
    fn test_day_window_in_offset_zone() {
        // IST is UTC+05:30
        let ist = FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
        let window = DayWindow::for_date(date(2024, 3, 15), &ist);

        assert_eq!(window.start, utc(2024, 3, 14, 18, 30, 0));
        assert_eq!(
            window.end,
            utc(2024, 3, 15, 18, 29, 59) + Duration::milliseconds(999)
        );
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date(" 2024-03-15 ").unwrap(), date(2024, 3, 15));
        assert!(matches!(
            parse_date("2024-3-5"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(parse_date("yesterday").is_err());
        assert_eq!(parse_date("").unwrap_err(), ValidationError::required("date"));
    }

    #[test]
    fn test_report_range_parse() {
        assert_eq!("weekly".parse::<ReportRange>().unwrap(), ReportRange::Weekly);
        assert_eq!(ReportRange::default(), ReportRange::Daily);

        let err = "hourly".parse::<ReportRange>().unwrap_err();
        assert!(matches!(err, ValidationError::NotAllowed { ref field, .. } if field == "range"));
    }

    #[test]
    fn test_report_windows() {
        let now = utc(2024, 3, 10, 15, 45, 12);

        let daily = ReportRange::Daily.window(now);
        assert_eq!(daily.start, utc(2024, 3, 10, 0, 0, 0));
        assert_eq!(daily.end, now);

        assert_eq!(ReportRange::Weekly.window(now).start, utc(2024, 3, 3, 0, 0, 0));
        assert_eq!(ReportRange::Monthly.window(now).start, utc(2024, 2, 10, 0, 0, 0));
        assert_eq!(ReportRange::Yearly.window(now).start, utc(2023, 3, 10, 0, 0, 0));
    }

    #[test]
    fn test_yearly_window_clamps_leap_day() {
        let now = utc(2024, 2, 29, 9, 0, 0);
        assert_eq!(ReportRange::Yearly.window(now).start, utc(2023, 2, 28, 0, 0, 0));
    }

    #[test]
    fn test_window_uses_local_midnight() {
        let ist = FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
        // 2024-03-10 01:00 IST is still 2024-03-09 in UTC
        let now = ist.with_ymd_and_hms(2024, 3, 10, 1, 0, 0).unwrap();

        let window = ReportRange::Daily.window(now);
        assert_eq!(window.start, utc(2024, 3, 9, 18, 30, 0));
    }

    #[test]
    fn test_truncate_to_millis() {
        let at = utc(2024, 1, 1, 0, 0, 0) + Duration::nanoseconds(1_234_567);
        assert_eq!(
            truncate_to_millis(at),
            utc(2024, 1, 1, 0, 0, 0) + Duration::milliseconds(1)
        );
    }
}
