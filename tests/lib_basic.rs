#![forbid(unsafe_code)]
use chrono::{TimeZone, Utc};
use renfort::{
    model::{AdminId, Staff, StaffId, Unit, UnitId},
    scheduler::{NewAssignment, SchedError, Scheduler},
};

fn actor() -> AdminId {
    AdminId::new("admin-test")
}

fn seed(s: &mut Scheduler) -> (StaffId, UnitId) {
    let staff = Staff::new("Alice Martin");
    let unit = Unit::new("Unité Nord");
    let sid = staff.id.clone();
    let uid = unit.id.clone();
    s.add_staff(vec![staff]);
    s.add_units(vec![unit]);
    (sid, uid)
}

fn assignment_input(
    staff: &StaffId,
    unit: &UnitId,
    date: &str,
    start: &str,
    end: &str,
) -> NewAssignment {
    NewAssignment {
        staff_id: staff.clone(),
        unit_id: unit.clone(),
        request_id: None,
        date: renfort::recur::parse_date(date).unwrap(),
        start_time: start.to_string(),
        end_time: end.to_string(),
        status: None,
        notes: None,
    }
}

#[test]
fn overlap_is_half_open() {
    let mut s = Scheduler::new();
    let (staff, unit) = seed(&mut s);

    s.create_assignment(&actor(), assignment_input(&staff, &unit, "2025-10-01", "08:00", "12:00"))
        .unwrap();

    let t = |h: u32| Utc.with_ymd_and_hms(2025, 10, 1, h, 0, 0).unwrap();
    assert!(s.check_overlap(&staff, t(10), t(14), None));
    assert!(s.check_overlap(&staff, t(7), t(9), None));
    // intervalles adjacents : [08,12) et [12,14) ne se chevauchent pas
    assert!(!s.check_overlap(&staff, t(12), t(14), None));
    assert!(!s.check_overlap(&staff, t(6), t(8), None));
}

#[test]
fn overlapping_manual_creation_is_rejected() {
    let mut s = Scheduler::new();
    let (staff, unit) = seed(&mut s);

    s.create_assignment(&actor(), assignment_input(&staff, &unit, "2025-10-01", "08:00", "12:00"))
        .unwrap();
    let err = s
        .create_assignment(&actor(), assignment_input(&staff, &unit, "2025-10-01", "10:00", "14:00"))
        .unwrap_err();
    assert!(matches!(err, SchedError::Overlap));

    // un créneau adjacent passe
    s.create_assignment(&actor(), assignment_input(&staff, &unit, "2025-10-01", "12:00", "14:00"))
        .unwrap();
}

#[test]
fn canceled_assignments_are_ignored_by_overlap_check() {
    let mut s = Scheduler::new();
    let (staff, unit) = seed(&mut s);

    let id = s
        .create_assignment(&actor(), assignment_input(&staff, &unit, "2025-10-01", "08:00", "12:00"))
        .unwrap();
    s.cancel_assignment(&id).unwrap();

    s.create_assignment(&actor(), assignment_input(&staff, &unit, "2025-10-01", "08:00", "12:00"))
        .unwrap();
}

#[test]
fn midnight_rollover_on_manual_path() {
    let mut s = Scheduler::new();
    let (staff, unit) = seed(&mut s);

    let id = s
        .create_assignment(&actor(), assignment_input(&staff, &unit, "2025-01-10", "22:00", "06:00"))
        .unwrap();
    let a = s.registry().find_assignment(&id).unwrap();
    assert_eq!(a.start, Utc.with_ymd_and_hms(2025, 1, 10, 22, 0, 0).unwrap());
    assert_eq!(a.end, Utc.with_ymd_and_hms(2025, 1, 11, 6, 0, 0).unwrap());
}

#[test]
fn update_excludes_own_record_from_overlap_check() {
    let mut s = Scheduler::new();
    let (staff, unit) = seed(&mut s);

    let id = s
        .create_assignment(&actor(), assignment_input(&staff, &unit, "2025-10-01", "08:00", "12:00"))
        .unwrap();
    // se décaler d'une heure chevauche sa propre fenêtre : doit passer
    s.update_assignment(&id, assignment_input(&staff, &unit, "2025-10-01", "09:00", "13:00"))
        .unwrap();
    let a = s.registry().find_assignment(&id).unwrap();
    assert_eq!(a.start, Utc.with_ymd_and_hms(2025, 10, 1, 9, 0, 0).unwrap());
}

#[test]
fn update_to_canceled_skips_overlap_check() {
    let mut s = Scheduler::new();
    let (staff, unit) = seed(&mut s);

    let first = s
        .create_assignment(&actor(), assignment_input(&staff, &unit, "2025-10-01", "08:00", "12:00"))
        .unwrap();
    s.create_assignment(&actor(), assignment_input(&staff, &unit, "2025-10-01", "12:00", "16:00"))
        .unwrap();

    let mut input = assignment_input(&staff, &unit, "2025-10-01", "11:00", "15:00");
    input.status = Some("Canceled".to_string());
    s.update_assignment(&first, input).unwrap();
}

#[test]
fn malformed_time_names_the_field() {
    let mut s = Scheduler::new();
    let (staff, unit) = seed(&mut s);

    let err = s
        .create_assignment(&actor(), assignment_input(&staff, &unit, "2025-10-01", "8h00", "12:00"))
        .unwrap_err();
    match err {
        SchedError::InvalidField { field, .. } => assert_eq!(field, "start_time"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unknown_references_are_rejected() {
    let mut s = Scheduler::new();
    let (staff, _) = seed(&mut s);

    let err = s
        .create_assignment(
            &actor(),
            assignment_input(&staff, &UnitId::new("nope"), "2025-10-01", "08:00", "12:00"),
        )
        .unwrap_err();
    assert!(matches!(err, SchedError::UnknownUnit(_)));

    let err = s
        .create_assignment(
            &actor(),
            assignment_input(&StaffId::new("nope"), &UnitId::new("nope"), "2025-10-01", "08:00", "12:00"),
        )
        .unwrap_err();
    assert!(matches!(err, SchedError::UnknownStaff(_)));
}
