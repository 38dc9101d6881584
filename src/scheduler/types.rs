use chrono::NaiveDate;
use thiserror::Error;

use crate::model::{RequestId, RequestStatus, RuleId, StaffId, UnitId};

#[derive(Error, Debug)]
pub enum SchedError {
    #[error("invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },
    #[error("invalid value: {0}")]
    InvalidValue(&'static str),
    #[error("staff already has an overlapping shift")]
    Overlap,
    #[error("unknown staff: {0}")]
    UnknownStaff(String),
    #[error("unknown unit: {0}")]
    UnknownUnit(String),
    #[error("unknown request: {0}")]
    UnknownRequest(String),
    #[error("unknown assignment: {0}")]
    UnknownAssignment(String),
    #[error("unknown recurring rule: {0}")]
    UnknownRule(String),
    #[error("duplicate occurrence for rule {0} on {1}")]
    DuplicateOccurrence(String, NaiveDate),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Bilan d'une passe d'expansion, par (règle, date) candidate.
///
/// `conflicts` reste vide pour les demandes : seule l'expansion
/// d'affectations est soumise au contrôle de chevauchement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionReport {
    pub created: Vec<(RuleId, NaiveDate)>,
    pub skipped: Vec<(RuleId, NaiveDate)>,
    pub conflicts: Vec<(RuleId, NaiveDate)>,
}

impl ExpansionReport {
    /// (créées, ignorées, conflits)
    pub fn counts(&self) -> (usize, usize, usize) {
        (self.created.len(), self.skipped.len(), self.conflicts.len())
    }
}

/// État de remplissage d'une demande. `status` est le statut que
/// l'enregistrement devrait porter ; rien n'est écrit ici.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestStatusView {
    pub filled: usize,
    pub satisfied: bool,
    pub status: RequestStatus,
}

/// Saisie d'une demande datée.
#[derive(Debug, Clone)]
pub struct NewRequest {
    pub unit_id: UnitId,
    pub coordinator_name: String,
    pub staff_needed: u32,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub status: Option<String>,
    pub notes: Option<String>,
}

/// Saisie d'une affectation datée.
#[derive(Debug, Clone)]
pub struct NewAssignment {
    pub staff_id: StaffId,
    pub unit_id: UnitId,
    pub request_id: Option<RequestId>,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub status: Option<String>,
    pub notes: Option<String>,
}

/// Saisie brute d'un motif de récurrence (heures « HH:MM », codes jours).
#[derive(Debug, Clone)]
pub struct RulePattern {
    pub start_time: String,
    pub end_time: String,
    pub days: Vec<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub is_active: bool,
}

/// Saisie d'une règle récurrente de demande.
#[derive(Debug, Clone)]
pub struct NewRecurringRequest {
    pub unit_id: UnitId,
    pub coordinator_name: String,
    pub staff_needed: u32,
    pub pattern: RulePattern,
    pub notes: Option<String>,
}

/// Saisie d'une règle récurrente d'affectation.
#[derive(Debug, Clone)]
pub struct NewRecurringAssignment {
    pub staff_id: StaffId,
    pub unit_id: UnitId,
    pub pattern: RulePattern,
    pub notes: Option<String>,
}
