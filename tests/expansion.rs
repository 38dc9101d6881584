#![forbid(unsafe_code)]
use chrono::{NaiveDate, TimeZone, Utc};
use renfort::{
    model::{AdminId, RequestStatus, Staff, StaffId, Unit, UnitId},
    scheduler::{NewRecurringAssignment, NewRecurringRequest, RulePattern, Scheduler},
};

fn actor() -> AdminId {
    AdminId::new("admin-test")
}

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
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

fn pattern(start: &str, end: &str, days: &str, from: NaiveDate, to: Option<NaiveDate>) -> RulePattern {
    RulePattern {
        start_time: start.to_string(),
        end_time: end.to_string(),
        days: days.split(',').map(str::to_string).collect(),
        start_date: from,
        end_date: to,
        is_active: true,
    }
}

fn assignment_rule(
    staff: &StaffId,
    unit: &UnitId,
    pattern: RulePattern,
    notes: Option<&str>,
) -> NewRecurringAssignment {
    NewRecurringAssignment {
        staff_id: staff.clone(),
        unit_id: unit.clone(),
        pattern,
        notes: notes.map(str::to_string),
    }
}

#[test]
fn expansion_is_idempotent() {
    let mut s = Scheduler::new();
    let (staff, unit) = seed(&mut s);
    s.create_recurring_assignment(
        &actor(),
        assignment_rule(
            &staff,
            &unit,
            pattern("09:00", "17:00", "MO,TU,WE,TH,FR", ymd(2025, 1, 1), None),
            None,
        ),
    )
    .unwrap();

    // lundi 6 janvier, horizon de 13 jours => 2 semaines ouvrées complètes
    let today = ymd(2025, 1, 6);
    let first = s.expand_assignment_occurrences(&actor(), 13, today);
    assert_eq!(first.counts(), (10, 0, 0));

    let second = s.expand_assignment_occurrences(&actor(), 13, today);
    assert_eq!(second.counts(), (0, 10, 0));
    assert_eq!(second.skipped.len(), first.created.len());
    assert_eq!(s.registry().assignments.len(), 10);
}

#[test]
fn no_occurrence_before_today_even_inside_validity_window() {
    let mut s = Scheduler::new();
    let (staff, unit) = seed(&mut s);
    s.create_recurring_assignment(
        &actor(),
        assignment_rule(
            &staff,
            &unit,
            pattern("09:00", "17:00", "MO,TU,WE,TH,FR,SA,SU", ymd(2025, 1, 1), None),
            None,
        ),
    )
    .unwrap();

    let report = s.expand_assignment_occurrences(&actor(), 2, ymd(2025, 1, 10));
    assert_eq!(report.counts(), (3, 0, 0));
    let earliest = s
        .registry()
        .assignments
        .iter()
        .map(|a| a.occurrence_date.unwrap())
        .min()
        .unwrap();
    assert_eq!(earliest, ymd(2025, 1, 10));
}

#[test]
fn expansion_stops_at_rule_end_date() {
    let mut s = Scheduler::new();
    let (staff, unit) = seed(&mut s);
    s.create_recurring_assignment(
        &actor(),
        assignment_rule(
            &staff,
            &unit,
            pattern(
                "09:00",
                "17:00",
                "MO,TU,WE,TH,FR,SA,SU",
                ymd(2025, 1, 1),
                Some(ymd(2025, 1, 12)),
            ),
            None,
        ),
    )
    .unwrap();

    let report = s.expand_assignment_occurrences(&actor(), 10, ymd(2025, 1, 10));
    assert_eq!(report.counts(), (3, 0, 0)); // 10, 11, 12 janvier
    assert!(s
        .registry()
        .assignments
        .iter()
        .all(|a| a.occurrence_date.unwrap() <= ymd(2025, 1, 12)));
}

#[test]
fn inactive_rule_is_never_expanded() {
    let mut s = Scheduler::new();
    let (staff, unit) = seed(&mut s);
    let mut p = pattern("09:00", "17:00", "MO,TU,WE,TH,FR,SA,SU", ymd(2025, 1, 1), None);
    p.is_active = false;
    s.create_recurring_assignment(&actor(), assignment_rule(&staff, &unit, p, None))
        .unwrap();

    let report = s.expand_assignment_occurrences(&actor(), 7, ymd(2025, 1, 10));
    assert_eq!(report.counts(), (0, 0, 0));
}

#[test]
fn overnight_rule_window_crosses_midnight() {
    let mut s = Scheduler::new();
    let (staff, unit) = seed(&mut s);
    // le 10 janvier 2025 est un vendredi
    s.create_recurring_assignment(
        &actor(),
        assignment_rule(
            &staff,
            &unit,
            pattern("22:00", "06:00", "FR", ymd(2025, 1, 10), Some(ymd(2025, 1, 10))),
            None,
        ),
    )
    .unwrap();

    let report = s.expand_assignment_occurrences(&actor(), 0, ymd(2025, 1, 10));
    assert_eq!(report.counts(), (1, 0, 0));
    let a = &s.registry().assignments[0];
    assert_eq!(a.start, Utc.with_ymd_and_hms(2025, 1, 10, 22, 0, 0).unwrap());
    assert_eq!(a.end, Utc.with_ymd_and_hms(2025, 1, 11, 6, 0, 0).unwrap());
}

#[test]
fn overlapping_rules_report_conflicts_without_creating() {
    let mut s = Scheduler::new();
    let (staff, unit) = seed(&mut s);
    s.create_recurring_assignment(
        &actor(),
        assignment_rule(
            &staff,
            &unit,
            pattern("09:00", "17:00", "MO,WE", ymd(2025, 1, 1), None),
            None,
        ),
    )
    .unwrap();
    let second = s
        .create_recurring_assignment(
            &actor(),
            assignment_rule(
                &staff,
                &unit,
                pattern("16:00", "20:00", "MO,WE", ymd(2025, 1, 1), None),
                None,
            ),
        )
        .unwrap();

    // lundi 6 et mercredi 8 janvier dans l'horizon
    let report = s.expand_assignment_occurrences(&actor(), 6, ymd(2025, 1, 6));
    assert_eq!(report.counts(), (2, 0, 2));
    assert!(report.conflicts.iter().all(|(rule, _)| rule == &second));
    assert!(s
        .registry()
        .assignment_occurrence(&second, ymd(2025, 1, 6))
        .is_none());

    // rejouer ne change rien : mêmes conflits, rien de créé
    let again = s.expand_assignment_occurrences(&actor(), 6, ymd(2025, 1, 6));
    assert_eq!(again.counts(), (0, 2, 2));
}

#[test]
fn deactivating_a_rule_stops_future_expansion_but_keeps_occurrences() {
    let mut s = Scheduler::new();
    let (staff, unit) = seed(&mut s);
    let rule = s
        .create_recurring_assignment(
            &actor(),
            assignment_rule(
                &staff,
                &unit,
                pattern("09:00", "17:00", "MO,TU,WE,TH,FR,SA,SU", ymd(2025, 1, 1), None),
                None,
            ),
        )
        .unwrap();

    let first = s.expand_assignment_occurrences(&actor(), 2, ymd(2025, 1, 10));
    assert_eq!(first.counts(), (3, 0, 0));

    let mut edited = pattern("09:00", "17:00", "MO,TU,WE,TH,FR,SA,SU", ymd(2025, 1, 1), None);
    edited.is_active = false;
    s.update_recurring_assignment(
        &rule,
        NewRecurringAssignment {
            staff_id: staff.clone(),
            unit_id: unit.clone(),
            pattern: edited,
            notes: None,
        },
    )
    .unwrap();

    // plus rien ne se génère, les occurrences déjà créées restent
    let after = s.expand_assignment_occurrences(&actor(), 10, ymd(2025, 1, 10));
    assert_eq!(after.counts(), (0, 0, 0));
    assert_eq!(s.registry().assignments.len(), 3);
}

#[test]
fn request_rules_have_no_overlap_constraint() {
    let mut s = Scheduler::new();
    let (_, unit) = seed(&mut s);
    for _ in 0..2 {
        s.create_recurring_request(
            &actor(),
            NewRecurringRequest {
                unit_id: unit.clone(),
                coordinator_name: "Mme Durand".to_string(),
                staff_needed: 2,
                pattern: pattern("09:00", "17:00", "MO", ymd(2025, 1, 1), None),
                notes: Some("apporter badge".to_string()),
            },
        )
        .unwrap();
    }

    let report = s.expand_request_occurrences(&actor(), 6, ymd(2025, 1, 6));
    assert_eq!(report.counts(), (2, 0, 0));
    for r in &s.registry().requests {
        assert_eq!(r.status, RequestStatus::Open);
        assert_eq!(r.notes.as_deref(), Some("apporter badge"));
        assert_eq!(r.occurrence_date, Some(ymd(2025, 1, 6)));
        assert_eq!(r.created_by, actor());
    }

    let again = s.expand_request_occurrences(&actor(), 6, ymd(2025, 1, 6));
    assert_eq!(again.counts(), (0, 2, 0));
}
