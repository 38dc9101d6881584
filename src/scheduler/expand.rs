//! Expansion des règles récurrentes en occurrences datées.
//!
//! Rejouable à volonté : une passe ne recrée jamais une clé (règle, date)
//! déjà matérialisée et ne génère rien avant `today`, même si la fenêtre de
//! validité de la règle commence plus tôt.

use chrono::{Duration, NaiveDate, Utc};

use super::types::ExpansionReport;
use super::{mutate, overlap};
use crate::model::{
    AdminId, Assignment, AssignmentId, AssignmentStatus, Registry, Request, RequestId,
    RequestStatus, RecurringAssignment, RecurringRequest,
};

pub(super) fn expand_requests(
    registry: &mut Registry,
    actor: &AdminId,
    horizon_days: u32,
    today: NaiveDate,
) -> ExpansionReport {
    let mut report = ExpansionReport::default();
    let horizon_end = today + Duration::days(i64::from(horizon_days));

    let rules: Vec<RecurringRequest> = registry
        .recurring_requests
        .iter()
        .filter(|r| r.recurrence.is_active)
        .cloned()
        .collect();

    for rule in rules {
        let mut d = today.max(rule.recurrence.start_date);
        while d <= horizon_end {
            if let Some(stop) = rule.recurrence.end_date {
                if d > stop {
                    break;
                }
            }
            if rule.recurrence.fires_on(d) {
                if registry.request_occurrence(&rule.id, d).is_some() {
                    report.skipped.push((rule.id.clone(), d));
                } else {
                    let (start, end) = rule.recurrence.window(d);
                    let occurrence = Request {
                        id: RequestId::random(),
                        unit_id: rule.unit_id.clone(),
                        coordinator_name: rule.coordinator_name.clone(),
                        staff_needed: rule.staff_needed,
                        start,
                        end,
                        status: RequestStatus::Open,
                        notes: rule.notes.clone(),
                        created_by: actor.clone(),
                        created_at: Utc::now(),
                        recurring_id: Some(rule.id.clone()),
                        occurrence_date: Some(d),
                    };
                    match mutate::insert_request_occurrence(registry, occurrence) {
                        Ok(()) => report.created.push((rule.id.clone(), d)),
                        // un doublon n'est pas une anomalie, juste un skip
                        Err(dup) => report.skipped.push((dup.rule_id, dup.date)),
                    }
                }
            }
            d += Duration::days(1);
        }
    }

    report
}

pub(super) fn expand_assignments(
    registry: &mut Registry,
    actor: &AdminId,
    horizon_days: u32,
    today: NaiveDate,
) -> ExpansionReport {
    let mut report = ExpansionReport::default();
    let horizon_end = today + Duration::days(i64::from(horizon_days));

    let rules: Vec<RecurringAssignment> = registry
        .recurring_assignments
        .iter()
        .filter(|r| r.recurrence.is_active)
        .cloned()
        .collect();

    for rule in rules {
        let mut d = today.max(rule.recurrence.start_date);
        while d <= horizon_end {
            if let Some(stop) = rule.recurrence.end_date {
                if d > stop {
                    break;
                }
            }
            if rule.recurrence.fires_on(d) {
                if registry.assignment_occurrence(&rule.id, d).is_some() {
                    report.skipped.push((rule.id.clone(), d));
                } else {
                    let (start, end) = rule.recurrence.window(d);
                    if overlap::has_overlap(registry, &rule.staff_id, start, end, None) {
                        report.conflicts.push((rule.id.clone(), d));
                    } else {
                        let occurrence = Assignment {
                            id: AssignmentId::random(),
                            staff_id: rule.staff_id.clone(),
                            unit_id: rule.unit_id.clone(),
                            request_id: None,
                            start,
                            end,
                            status: AssignmentStatus::Scheduled,
                            notes: rule.notes.clone(),
                            created_by: actor.clone(),
                            created_at: Utc::now(),
                            recurring_id: Some(rule.id.clone()),
                            occurrence_date: Some(d),
                        };
                        match mutate::insert_assignment_occurrence(registry, occurrence) {
                            Ok(()) => report.created.push((rule.id.clone(), d)),
                            Err(dup) => report.skipped.push((dup.rule_id, dup.date)),
                        }
                    }
                }
            }
            d += Duration::days(1);
        }
    }

    report
}
