//! Boundary-inclusive overlap between reservation date ranges
//!
//! Two closed ranges `[s1, e1]` and `[s2, e2]` overlap when
//! `s2 <= e1 && e2 >= s1`. A reservation ending on the day another begins
//! therefore conflicts with it.

use chrono::NaiveDate;

use crate::models::Reservation;

/// Whether a proposed range collides with an existing one.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use marina_server::reservations::overlaps;
///
/// let d = |s| NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap();
/// // touching endpoints count
/// assert!(overlaps(d("2024-06-01"), d("2024-06-10"), d("2024-06-10"), d("2024-06-15")));
/// assert!(!overlaps(d("2024-06-01"), d("2024-06-10"), d("2024-06-11"), d("2024-06-20")));
/// ```
pub fn overlaps(
    existing_start: NaiveDate,
    existing_end: NaiveDate,
    new_start: NaiveDate,
    new_end: NaiveDate,
) -> bool {
    new_start <= existing_end && new_end >= existing_start
}

/// First reservation in `existing` that collides with `[start, end]`.
pub fn find_conflict<'a, I>(existing: I, start: NaiveDate, end: NaiveDate) -> Option<&'a Reservation>
where
    I: IntoIterator<Item = &'a Reservation>,
{
    existing
        .into_iter()
        .find(|r| overlaps(r.start_date, r.end_date, start, end))
}
