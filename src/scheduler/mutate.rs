use chrono::{NaiveDate, Utc};

use super::types::{
    NewAssignment, NewRecurringAssignment, NewRecurringRequest, NewRequest, RulePattern, SchedError,
};
use super::overlap;
use crate::model::{
    AdminId, Assignment, AssignmentId, AssignmentStatus, Registry, Request, RequestId,
    RequestStatus, RecurringAssignment, RecurringRequest, RuleId,
};
use crate::recur::{combine_window, Recurrence, TimeOfDay, WeekdayMask};

fn parse_time(field: &'static str, s: &str) -> Result<TimeOfDay, SchedError> {
    TimeOfDay::parse(s).map_err(|reason| SchedError::InvalidField { field, reason })
}

fn require_unit(registry: &Registry, input: &NewRequest) -> Result<(), SchedError> {
    if registry.find_unit(&input.unit_id).is_none() {
        return Err(SchedError::UnknownUnit(input.unit_id.as_str().to_string()));
    }
    Ok(())
}

pub(super) fn create_request(
    registry: &mut Registry,
    actor: &AdminId,
    input: NewRequest,
) -> Result<RequestId, SchedError> {
    require_unit(registry, &input)?;
    if input.coordinator_name.trim().is_empty() {
        return Err(SchedError::InvalidValue("coordinator name is required"));
    }
    if input.staff_needed == 0 {
        return Err(SchedError::InvalidValue("staff_needed must be positive"));
    }
    let start = parse_time("start_time", &input.start_time)?;
    let end = parse_time("end_time", &input.end_time)?;
    let status = match &input.status {
        Some(s) => RequestStatus::parse(s)
            .map_err(|reason| SchedError::InvalidField { field: "status", reason })?,
        None => RequestStatus::Open,
    };
    let (start_dt, end_dt) = combine_window(input.date, start, end);

    let request = Request {
        id: RequestId::random(),
        unit_id: input.unit_id,
        coordinator_name: input.coordinator_name,
        staff_needed: input.staff_needed,
        start: start_dt,
        end: end_dt,
        status,
        notes: input.notes,
        created_by: actor.clone(),
        created_at: Utc::now(),
        recurring_id: None,
        occurrence_date: None,
    };
    let id = request.id.clone();
    registry.requests.push(request);
    Ok(id)
}

fn validate_assignment_refs(registry: &Registry, input: &NewAssignment) -> Result<(), SchedError> {
    if registry.find_staff(&input.staff_id).is_none() {
        return Err(SchedError::UnknownStaff(input.staff_id.as_str().to_string()));
    }
    if registry.find_unit(&input.unit_id).is_none() {
        return Err(SchedError::UnknownUnit(input.unit_id.as_str().to_string()));
    }
    if let Some(req) = &input.request_id {
        if registry.find_request(req).is_none() {
            return Err(SchedError::UnknownRequest(req.as_str().to_string()));
        }
    }
    Ok(())
}

pub(super) fn create_assignment(
    registry: &mut Registry,
    actor: &AdminId,
    input: NewAssignment,
) -> Result<AssignmentId, SchedError> {
    validate_assignment_refs(registry, &input)?;
    let start = parse_time("start_time", &input.start_time)?;
    let end = parse_time("end_time", &input.end_time)?;
    let status = match &input.status {
        Some(s) => AssignmentStatus::parse(s)
            .map_err(|reason| SchedError::InvalidField { field: "status", reason })?,
        None => AssignmentStatus::Scheduled,
    };
    let (start_dt, end_dt) = combine_window(input.date, start, end);

    if overlap::has_overlap(registry, &input.staff_id, start_dt, end_dt, None) {
        return Err(SchedError::Overlap);
    }

    let assignment = Assignment {
        id: AssignmentId::random(),
        staff_id: input.staff_id,
        unit_id: input.unit_id,
        request_id: input.request_id,
        start: start_dt,
        end: end_dt,
        status,
        notes: input.notes,
        created_by: actor.clone(),
        created_at: Utc::now(),
        recurring_id: None,
        occurrence_date: None,
    };
    let id = assignment.id.clone();
    registry.assignments.push(assignment);
    Ok(id)
}

/// Ré-édite une affectation existante. Le contrôle de chevauchement exclut
/// la fiche elle-même et n'est pas appliqué quand le nouveau statut est
/// Canceled. La clé (règle, date) d'une occurrence générée est conservée.
pub(super) fn update_assignment(
    registry: &mut Registry,
    id: &AssignmentId,
    input: NewAssignment,
) -> Result<(), SchedError> {
    if registry.find_assignment(id).is_none() {
        return Err(SchedError::UnknownAssignment(id.as_str().to_string()));
    }
    validate_assignment_refs(registry, &input)?;
    let start = parse_time("start_time", &input.start_time)?;
    let end = parse_time("end_time", &input.end_time)?;
    let status = match &input.status {
        Some(s) => AssignmentStatus::parse(s)
            .map_err(|reason| SchedError::InvalidField { field: "status", reason })?,
        None => AssignmentStatus::Scheduled,
    };
    let (start_dt, end_dt) = combine_window(input.date, start, end);

    if status != AssignmentStatus::Canceled
        && overlap::has_overlap(registry, &input.staff_id, start_dt, end_dt, Some(id))
    {
        return Err(SchedError::Overlap);
    }

    let a = registry
        .find_assignment_mut(id)
        .ok_or_else(|| SchedError::UnknownAssignment(id.as_str().to_string()))?;
    a.staff_id = input.staff_id;
    a.unit_id = input.unit_id;
    a.request_id = input.request_id;
    a.start = start_dt;
    a.end = end_dt;
    a.status = status;
    a.notes = input.notes;
    Ok(())
}

pub(super) fn cancel_request(registry: &mut Registry, id: &RequestId) -> Result<(), SchedError> {
    let r = registry
        .find_request_mut(id)
        .ok_or_else(|| SchedError::UnknownRequest(id.as_str().to_string()))?;
    r.status = RequestStatus::Canceled;
    Ok(())
}

pub(super) fn cancel_assignment(
    registry: &mut Registry,
    id: &AssignmentId,
) -> Result<(), SchedError> {
    let a = registry
        .find_assignment_mut(id)
        .ok_or_else(|| SchedError::UnknownAssignment(id.as_str().to_string()))?;
    a.status = AssignmentStatus::Canceled;
    Ok(())
}

/// Valide une saisie de motif et construit la récurrence.
pub(super) fn build_recurrence(pattern: &RulePattern) -> Result<Recurrence, SchedError> {
    let start_time = parse_time("start_time", &pattern.start_time)?;
    let end_time = parse_time("end_time", &pattern.end_time)?;
    let days = WeekdayMask::from_codes(&pattern.days)
        .map_err(|reason| SchedError::InvalidField { field: "days", reason })?;
    if days.is_empty() {
        return Err(SchedError::InvalidValue("select at least one day of the week"));
    }
    Ok(Recurrence {
        start_time,
        end_time,
        days,
        start_date: pattern.start_date,
        end_date: pattern.end_date,
        is_active: pattern.is_active,
    })
}

pub(super) fn create_recurring_request(
    registry: &mut Registry,
    actor: &AdminId,
    input: NewRecurringRequest,
) -> Result<RuleId, SchedError> {
    if registry.find_unit(&input.unit_id).is_none() {
        return Err(SchedError::UnknownUnit(input.unit_id.as_str().to_string()));
    }
    if input.coordinator_name.trim().is_empty() {
        return Err(SchedError::InvalidValue("coordinator name is required"));
    }
    if input.staff_needed == 0 {
        return Err(SchedError::InvalidValue("staff_needed must be positive"));
    }
    let recurrence = build_recurrence(&input.pattern)?;

    let rule = RecurringRequest {
        id: RuleId::random(),
        unit_id: input.unit_id,
        coordinator_name: input.coordinator_name,
        staff_needed: input.staff_needed,
        recurrence,
        notes: input.notes,
        created_by: actor.clone(),
        created_at: Utc::now(),
    };
    let id = rule.id.clone();
    registry.recurring_requests.push(rule);
    Ok(id)
}

pub(super) fn update_recurring_request(
    registry: &mut Registry,
    id: &RuleId,
    input: NewRecurringRequest,
) -> Result<(), SchedError> {
    if registry.find_unit(&input.unit_id).is_none() {
        return Err(SchedError::UnknownUnit(input.unit_id.as_str().to_string()));
    }
    if input.coordinator_name.trim().is_empty() {
        return Err(SchedError::InvalidValue("coordinator name is required"));
    }
    if input.staff_needed == 0 {
        return Err(SchedError::InvalidValue("staff_needed must be positive"));
    }
    let recurrence = build_recurrence(&input.pattern)?;

    let rule = registry
        .find_recurring_request_mut(id)
        .ok_or_else(|| SchedError::UnknownRule(id.as_str().to_string()))?;
    rule.unit_id = input.unit_id;
    rule.coordinator_name = input.coordinator_name;
    rule.staff_needed = input.staff_needed;
    rule.recurrence = recurrence;
    rule.notes = input.notes;
    Ok(())
}

pub(super) fn create_recurring_assignment(
    registry: &mut Registry,
    actor: &AdminId,
    input: NewRecurringAssignment,
) -> Result<RuleId, SchedError> {
    if registry.find_staff(&input.staff_id).is_none() {
        return Err(SchedError::UnknownStaff(input.staff_id.as_str().to_string()));
    }
    if registry.find_unit(&input.unit_id).is_none() {
        return Err(SchedError::UnknownUnit(input.unit_id.as_str().to_string()));
    }
    let recurrence = build_recurrence(&input.pattern)?;

    let rule = RecurringAssignment {
        id: RuleId::random(),
        staff_id: input.staff_id,
        unit_id: input.unit_id,
        recurrence,
        notes: input.notes,
        created_by: actor.clone(),
        created_at: Utc::now(),
    };
    let id = rule.id.clone();
    registry.recurring_assignments.push(rule);
    Ok(id)
}

pub(super) fn update_recurring_assignment(
    registry: &mut Registry,
    id: &RuleId,
    input: NewRecurringAssignment,
) -> Result<(), SchedError> {
    if registry.find_staff(&input.staff_id).is_none() {
        return Err(SchedError::UnknownStaff(input.staff_id.as_str().to_string()));
    }
    if registry.find_unit(&input.unit_id).is_none() {
        return Err(SchedError::UnknownUnit(input.unit_id.as_str().to_string()));
    }
    let recurrence = build_recurrence(&input.pattern)?;

    let rule = registry
        .find_recurring_assignment_mut(id)
        .ok_or_else(|| SchedError::UnknownRule(id.as_str().to_string()))?;
    rule.staff_id = input.staff_id;
    rule.unit_id = input.unit_id;
    rule.recurrence = recurrence;
    rule.notes = input.notes;
    Ok(())
}

/// Clé (règle, date) déjà matérialisée : seule issue d'échec des gardes
/// d'unicité ci-dessous. L'expansion la consomme comme un skip ordinaire ;
/// une frontière qui veut une erreur passe par la conversion [`SchedError`].
#[derive(Debug, Clone)]
pub(super) struct DuplicateKey {
    pub rule_id: RuleId,
    pub date: NaiveDate,
}

impl From<DuplicateKey> for SchedError {
    fn from(key: DuplicateKey) -> Self {
        SchedError::DuplicateOccurrence(key.rule_id.as_str().to_string(), key.date)
    }
}

/// Garde-fou d'unicité : refuse une seconde occurrence pour la même clé
/// (règle, date). L'expansion vérifie l'existence en amont ; ceci reste le
/// dernier rempart faute de contrainte d'unicité côté stockage.
pub(super) fn insert_request_occurrence(
    registry: &mut Registry,
    occurrence: Request,
) -> Result<(), DuplicateKey> {
    if let (Some(rule), Some(date)) = (&occurrence.recurring_id, occurrence.occurrence_date) {
        if registry.request_occurrence(rule, date).is_some() {
            return Err(DuplicateKey {
                rule_id: rule.clone(),
                date,
            });
        }
    }
    registry.requests.push(occurrence);
    Ok(())
}

pub(super) fn insert_assignment_occurrence(
    registry: &mut Registry,
    occurrence: Assignment,
) -> Result<(), DuplicateKey> {
    if let (Some(rule), Some(date)) = (&occurrence.recurring_id, occurrence.occurrence_date) {
        if registry.assignment_occurrence(rule, date).is_some() {
            return Err(DuplicateKey {
                rule_id: rule.clone(),
                date,
            });
        }
    }
    registry.assignments.push(occurrence);
    Ok(())
}
