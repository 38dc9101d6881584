//! Suivi de remplissage des demandes de couverture.

use super::types::{RequestStatusView, SchedError};
use crate::model::{AssignmentStatus, Registry, RequestId, RequestStatus};

/// Nombre d'affectations non annulées rattachées à la demande.
pub(super) fn filled_count(registry: &Registry, request_id: &RequestId) -> usize {
    registry
        .assignments
        .iter()
        .filter(|a| a.request_id.as_ref() == Some(request_id))
        .filter(|a| a.status != AssignmentStatus::Canceled)
        .count()
}

pub(super) fn is_satisfied(staff_needed: u32, filled: usize) -> bool {
    filled >= staff_needed as usize
}

/// Vue pure : compte, satisfaction, et statut que la fiche devrait porter.
/// Une demande annulée reste annulée quel que soit son remplissage.
pub(super) fn request_status(
    registry: &Registry,
    id: &RequestId,
) -> Result<RequestStatusView, SchedError> {
    let request = registry
        .find_request(id)
        .ok_or_else(|| SchedError::UnknownRequest(id.as_str().to_string()))?;
    let filled = filled_count(registry, id);
    let satisfied = is_satisfied(request.staff_needed, filled);
    let status = match request.status {
        RequestStatus::Canceled => RequestStatus::Canceled,
        _ if satisfied => RequestStatus::Satisfied,
        _ => RequestStatus::Open,
    };
    Ok(RequestStatusView {
        filled,
        satisfied,
        status,
    })
}

/// Applique à la fiche le statut recalculé. Étape d'écriture explicite et
/// séparée de la vue pure : historiquement ce recalcul était un effet de
/// bord de la consultation, il reste déclenchable après chaque lecture.
pub(super) fn recompute_and_persist_status(
    registry: &mut Registry,
    id: &RequestId,
) -> Result<RequestStatus, SchedError> {
    let view = request_status(registry, id)?;
    let request = registry
        .find_request_mut(id)
        .ok_or_else(|| SchedError::UnknownRequest(id.as_str().to_string()))?;
    request.status = view.status;
    Ok(view.status)
}
