#![forbid(unsafe_code)]
//! Renfort — bibliothèque de planification de personnel locale (sans BD).
//!
//! - Stockage fichier (JSON), sauvegarde atomique.
//! - Expansion de règles récurrentes en occurrences datées, sans doublons.
//! - Contrôle de chevauchement sur intervalles semi-ouverts [start, end).
//! - Vue calendaire bi-hebdomadaire ancrée sur une date de référence.
//! - Tout en UTC ; les heures « HH:MM » ne prennent sens qu'avec une date.

pub mod calendar;
pub mod io;
pub mod model;
pub mod recur;
pub mod scheduler;
pub mod storage;

pub use calendar::{biweek_period, biweek_total, bucket_by_day, total_hours, BiweekPeriod, WeekRange};
pub use model::{
    AdminId, Assignment, AssignmentId, AssignmentStatus, Registry, Request, RequestId,
    RequestStatus, RecurringAssignment, RecurringRequest, RuleId, Staff, StaffId, Unit, UnitId,
};
pub use recur::{Recurrence, TimeOfDay, WeekdayMask};
pub use scheduler::{
    ExpansionReport, NewAssignment, NewRecurringAssignment, NewRecurringRequest, NewRequest,
    RequestStatusView, RulePattern, SchedError, Scheduler,
};
pub use storage::{JsonStorage, Storage};
