//! Report filtering by issue type, urgency and detection date.

use chrono::NaiveDate;
use webgis_source_models::{ReportRecord, UrgencyLevel};

/// Errors that can occur while building a [`ReportFilter`].
#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    /// Date is not in `YYYY-MM-DD` form.
    #[error("Invalid date {value:?}: expected YYYY-MM-DD")]
    Date {
        /// Raw value.
        value: String,
    },

    /// Urgency is not a recognized level.
    #[error("Invalid urgency {value:?}")]
    Urgency {
        /// Raw value.
        value: String,
    },
}

/// Criteria a report must meet to be listed. Unset criteria match all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportFilter {
    /// Issue type, compared case-insensitively.
    pub issue_type: Option<String>,
    /// Urgency level.
    pub urgency: Option<UrgencyLevel>,
    /// Earliest detection date, inclusive.
    pub from: Option<NaiveDate>,
    /// Latest detection date, inclusive.
    pub to: Option<NaiveDate>,
}

impl ReportFilter {
    /// Builds a filter from raw query values. Blank values are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError`] if a date or urgency does not parse.
    pub fn parse(
        issue_type: Option<&str>,
        urgency: Option<&str>,
        from: Option<&str>,
        to: Option<&str>,
    ) -> Result<Self, FilterError> {
        let urgency = non_blank(urgency)
            .map(|value| {
                value.parse::<UrgencyLevel>().map_err(|_| FilterError::Urgency {
                    value: value.to_string(),
                })
            })
            .transpose()?;

        Ok(Self {
            issue_type: non_blank(issue_type).map(str::to_string),
            urgency,
            from: non_blank(from).map(parse_date).transpose()?,
            to: non_blank(to).map(parse_date).transpose()?,
        })
    }

    /// Whether any criterion is set.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.issue_type.is_some()
            || self.urgency.is_some()
            || self.from.is_some()
            || self.to.is_some()
    }

    /// Whether `record` meets every criterion.
    ///
    /// A date bound excludes reports whose detection date is missing or
    /// unparseable.
    #[must_use]
    pub fn matches(&self, record: &ReportRecord) -> bool {
        if let Some(issue_type) = &self.issue_type {
            let matches_type = record
                .issue_type
                .as_deref()
                .is_some_and(|t| t.eq_ignore_ascii_case(issue_type));
            if !matches_type {
                return false;
            }
        }

        if self.urgency.is_some_and(|urgency| record.urgency() != urgency) {
            return false;
        }

        if self.from.is_some() || self.to.is_some() {
            let Some(date) = detection_date(record) else {
                return false;
            };
            if self.from.is_some_and(|from| date < from) || self.to.is_some_and(|to| date > to) {
                return false;
            }
        }

        true
    }

    /// Returns the rows that meet every criterion, in their original order.
    #[must_use]
    pub fn apply(&self, rows: &[ReportRecord]) -> Vec<ReportRecord> {
        rows.iter().filter(|row| self.matches(row)).cloned().collect()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_date(value: &str) -> Result<NaiveDate, FilterError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| FilterError::Date {
        value: value.to_string(),
    })
}

/// Parses the date part of a report's detection date. Accepts plain dates
/// and ISO timestamps (`2024-11-02T10:00:00`).
fn detection_date(record: &ReportRecord) -> Option<NaiveDate> {
    let raw = record.detection_date.as_deref()?.trim();
    let date_part = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(issue_type: &str, urgency: &str, date: Option<&str>) -> ReportRecord {
        ReportRecord {
            issue_type: Some(issue_type.to_string()),
            urgency_level: Some(urgency.to_string()),
            detection_date: date.map(str::to_string),
            ..ReportRecord::default()
        }
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = ReportFilter::parse(None, Some(""), Some("  "), None).unwrap();
        assert!(!filter.is_active());
        assert!(filter.matches(&ReportRecord::default()));
    }

    #[test]
    fn filters_by_issue_type_and_urgency() {
        let filter = ReportFilter::parse(Some("Structural"), Some("alto"), None, None).unwrap();
        assert!(filter.matches(&record("structural", "high", None)));
        assert!(!filter.matches(&record("structural", "low", None)));
        assert!(!filter.matches(&record("electrical", "high", None)));
    }

    #[test]
    fn filters_by_inclusive_date_range() {
        let filter =
            ReportFilter::parse(None, None, Some("2024-11-01"), Some("2024-11-30")).unwrap();
        assert!(filter.matches(&record("other", "low", Some("2024-11-01"))));
        assert!(filter.matches(&record("other", "low", Some("2024-11-30T23:10:00"))));
        assert!(!filter.matches(&record("other", "low", Some("2024-12-01"))));
        assert!(!filter.matches(&record("other", "low", Some("ayer"))));
        assert!(!filter.matches(&record("other", "low", None)));
    }

    #[test]
    fn apply_keeps_order() {
        let rows = vec![
            record("a", "low", None),
            record("b", "high", None),
            record("c", "low", None),
        ];
        let filter = ReportFilter::parse(None, Some("low"), None, None).unwrap();
        let kept: Vec<_> = filter
            .apply(&rows)
            .into_iter()
            .filter_map(|r| r.issue_type)
            .collect();
        assert_eq!(kept, ["a", "c"]);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            ReportFilter::parse(None, None, Some("01/11/2024"), None),
            Err(FilterError::Date { .. })
        ));
        assert!(matches!(
            ReportFilter::parse(None, Some("urgent"), None, None),
            Err(FilterError::Urgency { .. })
        ));
    }
}
