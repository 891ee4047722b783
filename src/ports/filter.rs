//! Lookup filters shared by every `find` operation.
//!
//! Each field is optional. An absent field imposes no constraint; a present
//! field adds exactly one. `matches` is the in-memory reading of a filter;
//! the SQL reading lives with the Postgres adapter.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::agreement::{Agreement, Occurrence, Schedule};
use crate::domain::foundation::{
    AgreementId, LocationId, OccurrenceId, OrganizationId, RecordStatus, ScheduleId,
};
use crate::domain::report::ReportProjection;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgreementFilter {
    pub organization_id: Option<OrganizationId>,
    pub location_id: Option<LocationId>,
    pub status: Option<RecordStatus>,
}

impl AgreementFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_organization(mut self, id: OrganizationId) -> Self {
        self.organization_id = Some(id);
        self
    }

    pub fn with_location(mut self, id: LocationId) -> Self {
        self.location_id = Some(id);
        self
    }

    pub fn with_status(mut self, status: RecordStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn matches(&self, agreement: &Agreement) -> bool {
        self.organization_id
            .map_or(true, |id| agreement.organization_id() == &id)
            && self
                .location_id
                .map_or(true, |id| agreement.location_id() == &id)
            && self.status.map_or(true, |s| agreement.status() == s)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleFilter {
    pub agreement_id: Option<AgreementId>,
    pub location_id: Option<LocationId>,
    pub status: Option<RecordStatus>,
}

impl ScheduleFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_agreement(mut self, id: AgreementId) -> Self {
        self.agreement_id = Some(id);
        self
    }

    pub fn with_location(mut self, id: LocationId) -> Self {
        self.location_id = Some(id);
        self
    }

    pub fn with_status(mut self, status: RecordStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn matches(&self, schedule: &Schedule) -> bool {
        self.agreement_id
            .map_or(true, |id| schedule.agreement_id() == &id)
            && self
                .location_id
                .map_or(true, |id| schedule.location_id() == &id)
            && self.status.map_or(true, |s| schedule.status() == s)
    }
}

/// Occurrence lookup. Start bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccurrenceFilter {
    pub schedule_id: Option<ScheduleId>,
    pub starts_from: Option<NaiveDateTime>,
    pub starts_until: Option<NaiveDateTime>,
    pub cancelled: Option<bool>,
}

impl OccurrenceFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_schedule(mut self, id: ScheduleId) -> Self {
        self.schedule_id = Some(id);
        self
    }

    pub fn with_starts_from(mut self, from: NaiveDateTime) -> Self {
        self.starts_from = Some(from);
        self
    }

    pub fn with_starts_until(mut self, until: NaiveDateTime) -> Self {
        self.starts_until = Some(until);
        self
    }

    pub fn with_cancelled(mut self, cancelled: bool) -> Self {
        self.cancelled = Some(cancelled);
        self
    }

    pub fn matches(&self, occurrence: &Occurrence) -> bool {
        self.schedule_id
            .map_or(true, |id| occurrence.schedule_id() == &id)
            && self
                .starts_from
                .map_or(true, |from| occurrence.starts_at() >= from)
            && self
                .starts_until
                .map_or(true, |until| occurrence.starts_at() <= until)
            && self
                .cancelled
                .map_or(true, |c| occurrence.is_cancelled() == c)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportFilter {
    pub occurrence_ids: Option<Vec<OccurrenceId>>,
    pub reported: Option<bool>,
}

impl ReportFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_occurrences(mut self, ids: impl IntoIterator<Item = OccurrenceId>) -> Self {
        self.occurrence_ids = Some(ids.into_iter().collect());
        self
    }

    pub fn with_reported(mut self, reported: bool) -> Self {
        self.reported = Some(reported);
        self
    }

    pub fn matches(&self, report: &ReportProjection) -> bool {
        self.occurrence_ids
            .as_ref()
            .map_or(true, |ids| ids.contains(report.occurrence_id()))
            && self.reported.map_or(true, |r| report.is_reported() == r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::agreement::AgreementTerms;
    use crate::domain::foundation::Timestamp;
    use crate::domain::recurrence::OccurrenceWindow;
    use chrono::NaiveDate;

    fn agreement(organization_id: OrganizationId) -> Agreement {
        Agreement::new(
            AgreementId::new(),
            AgreementTerms {
                organization_id,
                location_id: LocationId::new(),
                valid_from: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                valid_until: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
                note: None,
            },
        )
        .unwrap()
    }

    fn occurrence(schedule_id: ScheduleId, day: u32) -> Occurrence {
        let date = NaiveDate::from_ymd_opt(2024, 3, day).unwrap();
        Occurrence::from_window(
            schedule_id,
            OccurrenceWindow::new(
                date.and_hms_opt(10, 0, 0).unwrap(),
                date.and_hms_opt(11, 0, 0).unwrap(),
            )
            .unwrap(),
        )
    }

    #[test]
    fn empty_filter_matches_everything() {
        assert!(AgreementFilter::new().matches(&agreement(OrganizationId::new())));
        assert!(OccurrenceFilter::new().matches(&occurrence(ScheduleId::new(), 4)));
    }

    #[test]
    fn each_present_field_adds_a_constraint() {
        let org = OrganizationId::new();
        let mut archived = agreement(org);
        archived.archive(Timestamp::now());

        assert!(AgreementFilter::new().with_organization(org).matches(&archived));
        assert!(!AgreementFilter::new()
            .with_organization(OrganizationId::new())
            .matches(&archived));
        assert!(!AgreementFilter::new()
            .with_organization(org)
            .with_status(RecordStatus::Active)
            .matches(&archived));
    }

    #[test]
    fn occurrence_start_bounds_are_inclusive() {
        let schedule_id = ScheduleId::new();
        let occ = occurrence(schedule_id, 4);
        let filter = OccurrenceFilter::new()
            .with_schedule(schedule_id)
            .with_starts_from(occ.starts_at())
            .with_starts_until(occ.starts_at());
        assert!(filter.matches(&occ));
        assert!(!filter.matches(&occurrence(schedule_id, 5)));
    }

    #[test]
    fn cancelled_flag_selects_by_cancellation() {
        let mut occ = occurrence(ScheduleId::new(), 4);
        assert!(OccurrenceFilter::new().with_cancelled(false).matches(&occ));
        occ.cancel(Timestamp::now());
        assert!(OccurrenceFilter::new().with_cancelled(true).matches(&occ));
        assert!(!OccurrenceFilter::new().with_cancelled(false).matches(&occ));
    }

    #[test]
    fn report_filter_membership() {
        let occ = occurrence(ScheduleId::new(), 4);
        let report = ReportProjection::for_occurrence(&occ);
        assert!(ReportFilter::new().with_occurrences([*occ.id()]).matches(&report));
        assert!(!ReportFilter::new()
            .with_occurrences(Vec::new())
            .matches(&report));
        assert!(ReportFilter::new().with_reported(false).matches(&report));
    }
}
