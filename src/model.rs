use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::recur::Recurrence;

/// Identifiant fort pour Staff
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StaffId(String);

impl StaffId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifiant fort pour Unit
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitId(String);

impl UnitId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifiant fort pour Request
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(String);

impl RequestId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifiant fort pour Assignment
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssignmentId(String);

impl AssignmentId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifiant fort pour une règle récurrente (demande ou affectation)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RuleId(String);

impl RuleId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifiant fort pour l'administrateur à l'origine d'une écriture
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AdminId(String);

impl AdminId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Statut d'une demande de couverture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestStatus {
    Open,
    Satisfied,
    Canceled,
}

impl RequestStatus {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s {
            "Open" => Ok(Self::Open),
            "Satisfied" => Ok(Self::Satisfied),
            "Canceled" => Ok(Self::Canceled),
            _ => Err(format!("unknown request status: {s}")),
        }
    }
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::Satisfied => "Satisfied",
            Self::Canceled => "Canceled",
        }
    }
}

/// Statut d'une affectation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignmentStatus {
    Scheduled,
    Confirmed,
    Canceled,
}

impl AssignmentStatus {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s {
            "Scheduled" => Ok(Self::Scheduled),
            "Confirmed" => Ok(Self::Confirmed),
            "Canceled" => Ok(Self::Canceled),
            _ => Err(format!("unknown assignment status: {s}")),
        }
    }
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "Scheduled",
            Self::Confirmed => "Confirmed",
            Self::Canceled => "Canceled",
        }
    }
}

/// Membre du personnel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Staff {
    pub id: StaffId,
    pub full_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Staff {
    pub fn new<N: Into<String>>(full_name: N) -> Self {
        Self {
            id: StaffId::random(),
            full_name: full_name.into(),
            phone: None,
            is_active: true,
            created_at: Utc::now(),
        }
    }
}

/// Unité cliente
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub unit_name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Unit {
    pub fn new<N: Into<String>>(unit_name: N) -> Self {
        Self {
            id: UnitId::random(),
            unit_name: unit_name.into(),
            address: None,
            is_active: true,
            created_at: Utc::now(),
        }
    }
}

/// Demande de couverture datée (occurrence concrète)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    pub id: RequestId,
    pub unit_id: UnitId,
    pub coordinator_name: String,
    pub staff_needed: u32,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: RequestStatus,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_by: AdminId,
    pub created_at: DateTime<Utc>,
    /// Présents uniquement si l'occurrence vient d'une règle récurrente ;
    /// le couple (recurring_id, occurrence_date) est une clé d'unicité.
    #[serde(default)]
    pub recurring_id: Option<RuleId>,
    #[serde(default)]
    pub occurrence_date: Option<NaiveDate>,
}

/// Affectation datée d'un membre du personnel à une unité
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    pub id: AssignmentId,
    pub staff_id: StaffId,
    pub unit_id: UnitId,
    #[serde(default)]
    pub request_id: Option<RequestId>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: AssignmentStatus,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_by: AdminId,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub recurring_id: Option<RuleId>,
    #[serde(default)]
    pub occurrence_date: Option<NaiveDate>,
}

impl Assignment {
    /// Durée en secondes (intervalle semi-ouvert [start, end)).
    pub fn duration_seconds(&self) -> i64 {
        (self.end - self.start).num_seconds()
    }
}

/// Règle récurrente produisant des demandes de couverture
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurringRequest {
    pub id: RuleId,
    pub unit_id: UnitId,
    pub coordinator_name: String,
    pub staff_needed: u32,
    pub recurrence: Recurrence,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_by: AdminId,
    pub created_at: DateTime<Utc>,
}

/// Règle récurrente produisant des affectations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurringAssignment {
    pub id: RuleId,
    pub staff_id: StaffId,
    pub unit_id: UnitId,
    pub recurrence: Recurrence,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_by: AdminId,
    pub created_at: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

/// Registre complet (magasin d'enregistrements en mémoire)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Registry {
    pub staff: Vec<Staff>,
    pub units: Vec<Unit>,
    pub requests: Vec<Request>,
    pub assignments: Vec<Assignment>,
    pub recurring_requests: Vec<RecurringRequest>,
    pub recurring_assignments: Vec<RecurringAssignment>,
}

impl Registry {
    pub fn find_staff<'a>(&'a self, id: &StaffId) -> Option<&'a Staff> {
        self.staff.iter().find(|s| &s.id == id)
    }
    pub fn find_unit<'a>(&'a self, id: &UnitId) -> Option<&'a Unit> {
        self.units.iter().find(|u| &u.id == id)
    }
    pub fn find_request<'a>(&'a self, id: &RequestId) -> Option<&'a Request> {
        self.requests.iter().find(|r| &r.id == id)
    }
    pub fn find_request_mut(&mut self, id: &RequestId) -> Option<&mut Request> {
        self.requests.iter_mut().find(|r| &r.id == id)
    }
    pub fn find_assignment<'a>(&'a self, id: &AssignmentId) -> Option<&'a Assignment> {
        self.assignments.iter().find(|a| &a.id == id)
    }
    pub fn find_assignment_mut(&mut self, id: &AssignmentId) -> Option<&mut Assignment> {
        self.assignments.iter_mut().find(|a| &a.id == id)
    }
    pub fn find_recurring_request<'a>(&'a self, id: &RuleId) -> Option<&'a RecurringRequest> {
        self.recurring_requests.iter().find(|r| &r.id == id)
    }
    pub fn find_recurring_request_mut(&mut self, id: &RuleId) -> Option<&mut RecurringRequest> {
        self.recurring_requests.iter_mut().find(|r| &r.id == id)
    }
    pub fn find_recurring_assignment<'a>(&'a self, id: &RuleId) -> Option<&'a RecurringAssignment> {
        self.recurring_assignments.iter().find(|r| &r.id == id)
    }
    pub fn find_recurring_assignment_mut(
        &mut self,
        id: &RuleId,
    ) -> Option<&mut RecurringAssignment> {
        self.recurring_assignments.iter_mut().find(|r| &r.id == id)
    }

    /// Occurrence de demande déjà matérialisée pour (règle, date) ?
    pub fn request_occurrence<'a>(&'a self, rule: &RuleId, date: NaiveDate) -> Option<&'a Request> {
        self.requests
            .iter()
            .find(|r| r.recurring_id.as_ref() == Some(rule) && r.occurrence_date == Some(date))
    }

    /// Occurrence d'affectation déjà matérialisée pour (règle, date) ?
    pub fn assignment_occurrence<'a>(
        &'a self,
        rule: &RuleId,
        date: NaiveDate,
    ) -> Option<&'a Assignment> {
        self.assignments
            .iter()
            .find(|a| a.recurring_id.as_ref() == Some(rule) && a.occurrence_date == Some(date))
    }
}
