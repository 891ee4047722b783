//! CreateAgreementHandler - atomic creation of an agreement graph.
//!
//! Validates every rule and expands every schedule up front, then writes
//! the agreement, its schedules, their occurrences and one report
//! projection per occurrence in a single transaction.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::application::{cascade, ServiceError};
use crate::domain::agreement::{
    Agreement, AgreementGraph, AgreementTerms, Schedule, ScheduleDefinition,
};
use crate::domain::foundation::{
    AgreementId, CommandMetadata, LocationId, ScheduleId, ValidationError,
};
use crate::domain::recurrence::{self, OccurrenceWindow, RecurrenceRuleParams};
use crate::ports::{Transaction, TransactionManager};

/// One schedule to create under the new agreement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRequest {
    pub location_id: LocationId,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub valid_from: NaiveDate,
    pub valid_until: NaiveDate,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub recurrence: Option<RecurrenceRuleParams>,
}

/// Command to create an agreement with its schedules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateAgreementCommand {
    pub terms: AgreementTerms,
    #[serde(default)]
    pub schedules: Vec<ScheduleRequest>,
}

/// Handler for creating agreements.
pub struct CreateAgreementHandler {
    transactions: Arc<dyn TransactionManager>,
    max_occurrences_per_schedule: usize,
}

impl CreateAgreementHandler {
    pub fn new(transactions: Arc<dyn TransactionManager>, max_occurrences_per_schedule: usize) -> Self {
        Self {
            transactions,
            max_occurrences_per_schedule,
        }
    }

    pub async fn handle(
        &self,
        cmd: CreateAgreementCommand,
        metadata: CommandMetadata,
    ) -> Result<AgreementGraph, ServiceError> {
        // 1. Validate and expand; nothing below this point can fail on input
        let (agreement, planned) = self.plan(cmd)?;

        // 2. Persist everything in one transaction
        let mut tx = self.transactions.begin().await?;
        let result = persist(tx.as_mut(), agreement, planned).await;
        let graph = cascade::finish(tx, result, "create_agreement", metadata.correlation_id()).await?;

        info!(
            agreement_id = %graph.agreement.id(),
            schedules = graph.schedules.len(),
            occurrences = graph.occurrence_count(),
            correlation_id = metadata.correlation_id(),
            "Agreement created"
        );
        Ok(graph)
    }

    fn plan(
        &self,
        cmd: CreateAgreementCommand,
    ) -> Result<(Agreement, Vec<(Schedule, Vec<OccurrenceWindow>)>), ValidationError> {
        let agreement = Agreement::new(AgreementId::new(), cmd.terms)?;

        let mut planned = Vec::with_capacity(cmd.schedules.len());
        for request in cmd.schedules {
            let rule = request
                .recurrence
                .as_ref()
                .map(recurrence::validate)
                .transpose()?;
            let schedule = Schedule::new(
                ScheduleId::new(),
                *agreement.id(),
                ScheduleDefinition {
                    location_id: request.location_id,
                    start_time: request.start_time,
                    end_time: request.end_time,
                    valid_from: request.valid_from,
                    valid_until: request.valid_until,
                    note: request.note,
                    recurrence: rule,
                },
            )?;
            if !agreement.covers(schedule.valid_from(), schedule.valid_until()) {
                return Err(ValidationError::OutsideAgreement {
                    from: schedule.valid_from(),
                    until: schedule.valid_until(),
                });
            }
            let windows = schedule.occurrence_windows(self.max_occurrences_per_schedule)?;
            planned.push((schedule, windows));
        }
        Ok((agreement, planned))
    }
}

async fn persist(
    tx: &mut dyn Transaction,
    agreement: Agreement,
    planned: Vec<(Schedule, Vec<OccurrenceWindow>)>,
) -> Result<AgreementGraph, ServiceError> {
    tx.agreements().insert(&agreement).await?;

    let mut schedules = Vec::with_capacity(planned.len());
    for (schedule, windows) in planned {
        schedules.push(cascade::persist_schedule(tx, schedule, windows).await?);
    }
    Ok(AgreementGraph {
        agreement,
        schedules,
    })
}
