//! Timestamp encoding for TEXT columns.
//!
//! sqlx's default `DateTime` encoding drops the fraction when it is zero
//! (`…:00+00:00` next to `…:00.500+00:00`), which still sorts but makes the
//! stored values uneven. Bound values go through [`to_sql`] instead so every
//! row and every range bound has the same width.

use chrono::{DateTime, SecondsFormat, Utc};

/// `2024-03-15T23:59:59.999Z`
pub(crate) fn to_sql(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
