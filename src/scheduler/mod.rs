mod expand;
mod fulfillment;
mod mutate;
mod overlap;
mod types;

pub use types::{
    ExpansionReport, NewAssignment, NewRecurringAssignment, NewRecurringRequest, NewRequest,
    RequestStatusView, RulePattern, SchedError,
};

use chrono::{DateTime, NaiveDate, Utc};

use crate::model::{
    AdminId, AssignmentId, Registry, RequestId, RequestStatus, RuleId, Staff, StaffId, Unit,
};

/// Scheduler : encapsule le registre et porte toutes les opérations du cœur.
///
/// L'acteur (administrateur) est un paramètre explicite de chaque création ;
/// il n'y a pas de contexte utilisateur ambiant.
#[derive(Debug, Default)]
pub struct Scheduler {
    registry: Registry,
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            registry: Registry::default(),
        }
    }

    pub fn from_registry(registry: Registry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }
    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    pub fn add_staff(&mut self, staff: Vec<Staff>) {
        self.registry.staff.extend(staff);
    }

    pub fn add_units(&mut self, units: Vec<Unit>) {
        self.registry.units.extend(units);
    }

    /// Le membre a-t-il une affectation non annulée chevauchant [start, end) ?
    pub fn check_overlap(
        &self,
        staff_id: &StaffId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude: Option<&AssignmentId>,
    ) -> bool {
        overlap::has_overlap(&self.registry, staff_id, start, end, exclude)
    }

    pub fn create_request(
        &mut self,
        actor: &AdminId,
        input: NewRequest,
    ) -> Result<RequestId, SchedError> {
        mutate::create_request(&mut self.registry, actor, input)
    }

    pub fn create_assignment(
        &mut self,
        actor: &AdminId,
        input: NewAssignment,
    ) -> Result<AssignmentId, SchedError> {
        mutate::create_assignment(&mut self.registry, actor, input)
    }

    pub fn update_assignment(
        &mut self,
        id: &AssignmentId,
        input: NewAssignment,
    ) -> Result<(), SchedError> {
        mutate::update_assignment(&mut self.registry, id, input)
    }

    pub fn cancel_request(&mut self, id: &RequestId) -> Result<(), SchedError> {
        mutate::cancel_request(&mut self.registry, id)
    }

    pub fn cancel_assignment(&mut self, id: &AssignmentId) -> Result<(), SchedError> {
        mutate::cancel_assignment(&mut self.registry, id)
    }

    pub fn create_recurring_request(
        &mut self,
        actor: &AdminId,
        input: NewRecurringRequest,
    ) -> Result<RuleId, SchedError> {
        mutate::create_recurring_request(&mut self.registry, actor, input)
    }

    pub fn update_recurring_request(
        &mut self,
        id: &RuleId,
        input: NewRecurringRequest,
    ) -> Result<(), SchedError> {
        mutate::update_recurring_request(&mut self.registry, id, input)
    }

    pub fn create_recurring_assignment(
        &mut self,
        actor: &AdminId,
        input: NewRecurringAssignment,
    ) -> Result<RuleId, SchedError> {
        mutate::create_recurring_assignment(&mut self.registry, actor, input)
    }

    pub fn update_recurring_assignment(
        &mut self,
        id: &RuleId,
        input: NewRecurringAssignment,
    ) -> Result<(), SchedError> {
        mutate::update_recurring_assignment(&mut self.registry, id, input)
    }

    /// Matérialise les occurrences des règles de demande actives sur
    /// [today, today + horizon_days]. Idempotent.
    pub fn expand_request_occurrences(
        &mut self,
        actor: &AdminId,
        horizon_days: u32,
        today: NaiveDate,
    ) -> ExpansionReport {
        expand::expand_requests(&mut self.registry, actor, horizon_days, today)
    }

    /// Matérialise les occurrences des règles d'affectation actives sur
    /// [today, today + horizon_days]. Idempotent ; un chevauchement est
    /// compté en conflit sans interrompre la passe.
    pub fn expand_assignment_occurrences(
        &mut self,
        actor: &AdminId,
        horizon_days: u32,
        today: NaiveDate,
    ) -> ExpansionReport {
        expand::expand_assignments(&mut self.registry, actor, horizon_days, today)
    }

    /// Vue pure du remplissage d'une demande (aucune écriture).
    pub fn request_status(&self, id: &RequestId) -> Result<RequestStatusView, SchedError> {
        fulfillment::request_status(&self.registry, id)
    }

    /// Recalcule et écrit le statut de la demande (Open/Satisfied), sauf si
    /// elle est annulée. À appeler après consultation ou modification des
    /// affectations liées.
    pub fn recompute_and_persist_status(
        &mut self,
        id: &RequestId,
    ) -> Result<RequestStatus, SchedError> {
        fulfillment::recompute_and_persist_status(&mut self.registry, id)
    }
}
