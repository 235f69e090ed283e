//! # Domain Entities

use super::value_objects::{ChecklistField, Conditions};
use serde::{Deserialize, Serialize};
use shared_types::{DatetimeGroup, Handle, Timestamp};
use std::cmp::Ordering;
use std::fmt;

/// Store-generated report identifier. Strictly increasing with insertion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportId(pub i64);

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Extended situational checklist. Every field optional.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checklist {
    /// H / M / P.
    pub position: Option<String>,
    /// Y / I / N.
    pub commercial_power: Option<String>,
    /// Y / C / N.
    pub water: Option<String>,
    /// Y / N.
    pub sanitation: Option<String>,
    /// Y / N.
    pub grid_comms: Option<String>,
    /// Y / N.
    pub transportation: Option<String>,
    /// Free text.
    pub comments: Option<String>,
}

impl Checklist {
    /// True when no field is present.
    pub fn is_empty(&self) -> bool {
        self.position.is_none()
            && self.commercial_power.is_none()
            && self.water.is_none()
            && self.sanitation.is_none()
            && self.grid_comms.is_none()
            && self.transportation.is_none()
            && self.comments.is_none()
    }

    /// Coded value of one field.
    pub fn get(&self, field: ChecklistField) -> Option<&str> {
        match field {
            ChecklistField::Position => self.position.as_deref(),
            ChecklistField::CommercialPower => self.commercial_power.as_deref(),
            ChecklistField::Water => self.water.as_deref(),
            ChecklistField::Sanitation => self.sanitation.as_deref(),
            ChecklistField::GridComms => self.grid_comms.as_deref(),
            ChecklistField::Transportation => self.transportation.as_deref(),
        }
    }

    /// Drop blank strings so they persist as absent.
    pub fn compact(self) -> Self {
        fn keep(value: Option<String>) -> Option<String> {
            value.filter(|v| !v.trim().is_empty())
        }
        Self {
            position: keep(self.position),
            commercial_power: keep(self.commercial_power),
            water: keep(self.water),
            sanitation: keep(self.sanitation),
            grid_comms: keep(self.grid_comms),
            transportation: keep(self.transportation),
            comments: keep(self.comments),
        }
    }
}

/// Report as submitted, before the store assigns an id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStatusReport {
    /// Reporting handle.
    pub handle: Handle,
    /// Operator-supplied date-time group, opaque text.
    pub datetime_group: DatetimeGroup,
    /// State name.
    pub state: String,
    /// Neighborhood name.
    pub neighborhood: String,
    /// Free-text location (grid square preferred).
    pub location: String,
    /// Overall conditions.
    pub conditions: Conditions,
    /// Present only when conditions is B or C.
    pub checklist: Option<Checklist>,
}

impl NewStatusReport {
    /// Build a report, discarding the checklist when conditions is `A`.
    pub fn new(
        handle: impl Into<Handle>,
        datetime_group: DatetimeGroup,
        state: impl Into<String>,
        neighborhood: impl Into<String>,
        location: impl Into<String>,
        conditions: Conditions,
        checklist: Option<Checklist>,
    ) -> Self {
        Self {
            handle: handle.into(),
            datetime_group,
            state: state.into(),
            neighborhood: neighborhood.into(),
            location: location.into(),
            conditions,
            checklist,
        }
        .normalized()
    }

    /// Enforce the conditions-A rule and drop empty checklists.
    pub fn normalized(mut self) -> Self {
        self.checklist = if self.conditions.allows_checklist() {
            self.checklist
                .map(Checklist::compact)
                .filter(|c| !c.is_empty())
        } else {
            None
        };
        self
    }

    /// First required field that is blank, by column name.
    pub fn first_blank_field(&self) -> Option<&'static str> {
        if self.handle.trim().is_empty() {
            Some("handle")
        } else if self.datetime_group.is_blank() {
            Some("datetime_group")
        } else if self.state.trim().is_empty() {
            Some("state")
        } else if self.neighborhood.trim().is_empty() {
            Some("neighborhood")
        } else if self.location.trim().is_empty() {
            Some("location")
        } else {
            None
        }
    }
}

/// Persisted report. Immutable after insert.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    /// Store-generated id.
    pub id: ReportId,
    /// Report body.
    #[serde(flatten)]
    pub report: NewStatusReport,
    /// Insertion time.
    pub created_at: Timestamp,
}

impl StatusReport {
    /// Reporting handle.
    pub fn handle(&self) -> &str {
        &self.report.handle
    }

    /// Date-time group.
    pub fn datetime_group(&self) -> &DatetimeGroup {
        &self.report.datetime_group
    }
}

/// Newest-first ordering shared by every store: `datetime_group`
/// descending, then id descending.
pub fn newest_first(a: &StatusReport, b: &StatusReport) -> Ordering {
    b.report
        .datetime_group
        .cmp(&a.report.datetime_group)
        .then_with(|| b.id.cmp(&a.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn checklist() -> Checklist {
        Checklist {
            position: Some("H".into()),
            commercial_power: Some("N".into()),
            comments: Some("tree down on 5th".into()),
            ..Default::default()
        }
    }

    fn report(conditions: Conditions, checklist: Option<Checklist>) -> NewStatusReport {
        NewStatusReport::new(
            "BRAVO2",
            DatetimeGroup::from("2025-01-01 10:00"),
            "Texas",
            "Northside",
            "EM12ab",
            conditions,
            checklist,
        )
    }

    #[test]
    fn test_conditions_a_discards_checklist() {
        assert!(report(Conditions::A, Some(checklist())).checklist.is_none());
    }

    #[test]
    fn test_conditions_b_keeps_checklist() {
        assert_eq!(
            report(Conditions::B, Some(checklist())).checklist,
            Some(checklist())
        );
    }

    #[test]
    fn test_blank_checklist_collapses_to_none() {
        let blank = Checklist {
            comments: Some("   ".into()),
            ..Default::default()
        };
        assert!(report(Conditions::C, Some(blank)).checklist.is_none());
    }

    #[test]
    fn test_first_blank_field_order() {
        let mut r = report(Conditions::A, None);
        assert_eq!(r.first_blank_field(), None);
        r.location = " ".into();
        r.neighborhood = String::new();
        assert_eq!(r.first_blank_field(), Some("neighborhood"));
    }

    #[test]
    fn test_newest_first_breaks_ties_by_id() {
        let stored = |id: i64, dtg: &str| StatusReport {
            id: ReportId(id),
            report: NewStatusReport {
                datetime_group: DatetimeGroup::from(dtg),
                ..report(Conditions::A, None)
            },
            created_at: Utc::now(),
        };
        let mut reports = vec![
            stored(1, "2025-01-01 10:00"),
            stored(2, "2025-01-02 09:00"),
            stored(3, "2025-01-01 10:00"),
        ];
        reports.sort_by(newest_first);
        let ids: Vec<i64> = reports.iter().map(|r| r.id.0).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_status_report_serializes_flat() {
        let stored = StatusReport {
            id: ReportId(7),
            report: report(Conditions::A, None),
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&stored).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["handle"], "BRAVO2");
        assert_eq!(json["conditions"], "A");
    }
}
