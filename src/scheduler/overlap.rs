use chrono::{DateTime, Utc};

use crate::model::{AssignmentId, AssignmentStatus, Registry, StaffId};

/// Deux intervalles semi-ouverts [s1, e1) et [s2, e2) se chevauchent
/// ssi s1 < e2 et s2 < e1.
pub(super) fn overlaps(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// Le membre a-t-il déjà une affectation non annulée chevauchant [start, end) ?
///
/// Évalué sur l'état courant du registre à chaque appel, sans cache :
/// les statuts peuvent changer entre deux décisions. `exclude` écarte un
/// enregistrement de la recherche (contrôle d'une fiche contre elle-même
/// lors d'une édition).
pub(super) fn has_overlap(
    registry: &Registry,
    staff_id: &StaffId,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    exclude: Option<&AssignmentId>,
) -> bool {
    registry.assignments.iter().any(|a| {
        &a.staff_id == staff_id
            && a.status != AssignmentStatus::Canceled
            && exclude.map_or(true, |id| &a.id != id)
            && overlaps(a.start, a.end, start, end)
    })
}
