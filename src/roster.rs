//! Recent-intake roster grouping.
//!
//! Turns a flat sequence of intake records into the nested ordering
//! the sidebar and dashboard render: calendar date, then clock hour,
//! then the records inside that hour. The bucket whose date equals the
//! reference date is labeled `Today`; every other date gets a long
//! label like `September 14, 2025`. Hour buckets use the 12-hour
//! clock (`10 AM`, `2 PM`).
//!
//! Presentation order is newest-date-first, which requires the input
//! to be sorted descending by intake time. [`RosterOrder`] makes that
//! dependency explicit instead of leaving it to caller discipline:
//! `NewestFirst` states the precondition (the repository query already
//! orders this way), `Unsorted` stable-sorts here. Records whose
//! timestamp fails to parse are quarantined into
//! [`GroupedRoster::rejected`]; there is no "Invalid Date" bucket.
//!
//! Pure over its arguments; the reference date is a parameter so
//! `Today` labeling is deterministic.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::models::RecentPatient;

/// Sort contract between the caller and the grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RosterOrder {
    /// Input is already sorted descending by intake time.
    #[default]
    NewestFirst,
    /// No order guarantee; the grouping stable-sorts descending, so
    /// records with equal timestamps keep their input order.
    Unsorted,
}

/// Label for a day bucket.
pub const TODAY_LABEL: &str = "Today";

const DATE_LABEL_FORMAT: &str = "%B %-d, %Y";
const HOUR_LABEL_FORMAT: &str = "%-I %p";

/// One hour bucket within a day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HourGroup {
    pub label: String,
    pub patients: Vec<RecentPatient>,
}

/// One calendar-date bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayGroup {
    /// `Today` for the reference date, otherwise e.g. `September 14, 2025`.
    pub label: String,
    pub date: NaiveDate,
    pub hours: Vec<HourGroup>,
}

/// A record that could not be bucketed because its stored timestamp
/// does not parse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectedRecord {
    pub id: String,
    pub raw_time: String,
}

/// Grouped roster: day buckets in presentation order plus the
/// quarantined records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupedRoster {
    pub days: Vec<DayGroup>,
    pub rejected: Vec<RejectedRecord>,
}

impl GroupedRoster {
    /// Number of records that landed in a bucket.
    pub fn grouped_count(&self) -> usize {
        self.days
            .iter()
            .flat_map(|d| &d.hours)
            .map(|h| h.patients.len())
            .sum()
    }
}

/// Group records by calendar date, then by clock hour, preserving
/// first-seen order within each bucket.
pub fn group_by_date_and_hour(
    records: Vec<RecentPatient>,
    order: RosterOrder,
    today: NaiveDate,
) -> GroupedRoster {
    let mut rejected = Vec::new();
    let mut valid: Vec<(NaiveDateTime, RecentPatient)> = Vec::new();

    for record in records {
        match record.parsed_intake_time() {
            Some(t) => valid.push((t, record)),
            None => rejected.push(RejectedRecord {
                id: record.id,
                raw_time: record.intake_time,
            }),
        }
    }

    if order == RosterOrder::Unsorted {
        // sort_by is stable: equal timestamps keep input order
        valid.sort_by(|(a, _), (b, _)| b.cmp(a));
    }

    let mut days: Vec<DayGroup> = Vec::new();
    for (time, record) in valid {
        let date = time.date();
        let hour_label = time.format(HOUR_LABEL_FORMAT).to_string();

        let day_idx = match days.iter().position(|d| d.date == date) {
            Some(idx) => idx,
            None => {
                let label = if date == today {
                    TODAY_LABEL.to_string()
                } else {
                    date.format(DATE_LABEL_FORMAT).to_string()
                };
                days.push(DayGroup {
                    label,
                    date,
                    hours: Vec::new(),
                });
                days.len() - 1
            }
        };

        let hours = &mut days[day_idx].hours;
        match hours.iter().position(|h| h.label == hour_label) {
            Some(idx) => hours[idx].patients.push(record),
            None => hours.push(HourGroup {
                label: hour_label,
                patients: vec![record],
            }),
        }
    }

    GroupedRoster { days, rejected }
}
