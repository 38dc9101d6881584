//! Vue calendaire bi-hebdomadaire : périodes de 14 jours ancrées sur une date
//! de référence fixe, regroupement par jour et totaux d'heures.
//!
//! Deux conventions de début de semaine coexistent selon la vue (vendredi pour
//! le planning bi-hebdomadaire, samedi pour l'utilitaire semaine) ; le premier
//! jour est donc toujours un paramètre, jamais une constante.

use chrono::{Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
use std::collections::BTreeMap;

use crate::model::Assignment;

/// Semaine [start, end) avec `end` exclusif.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Période de 14 jours découpée en deux semaines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BiweekPeriod {
    pub start: NaiveDate,
    /// Exclusif (start + 14).
    pub end: NaiveDate,
    pub week1: WeekRange,
    pub week2: WeekRange,
}

/// Recule `d` jusqu'au `first_day` qui ouvre sa semaine.
pub fn week_start(d: NaiveDate, first_day: Weekday) -> NaiveDate {
    let delta = (i64::from(d.weekday().num_days_from_monday()) + 7
        - i64::from(first_day.num_days_from_monday()))
        % 7;
    d - Duration::days(delta)
}

/// Semaine contenant `d` : (début, fin exclusive, les 7 jours).
pub fn week_range(d: NaiveDate, first_day: Weekday) -> (NaiveDate, NaiveDate, Vec<NaiveDate>) {
    let start = week_start(d, first_day);
    let days = (0..7).map(|i| start + Duration::days(i)).collect();
    (start, start + Duration::days(7), days)
}

/// Début de la période de 14 jours contenant `d`, les périodes pavant le
/// calendrier à partir de `anchor`. `d` est d'abord ramenée au début de sa
/// semaine pour que le résultat ne dépende pas de sa position exacte.
pub fn biweek_start(d: NaiveDate, anchor: NaiveDate, first_day: Weekday) -> NaiveDate {
    let d0 = week_start(d, first_day);
    let block = (d0 - anchor).num_days().div_euclid(14);
    anchor + Duration::days(block * 14)
}

/// Période bi-hebdomadaire complète autour de `query`.
pub fn biweek_period(query: NaiveDate, anchor: NaiveDate, first_day: Weekday) -> BiweekPeriod {
    let start = biweek_start(query, anchor, first_day);
    let mid = start + Duration::days(7);
    let end = start + Duration::days(14);
    BiweekPeriod {
        start,
        end,
        week1: WeekRange { start, end: mid },
        week2: WeekRange { start: mid, end },
    }
}

/// Répartit des affectations entre les deux semaines de la période, d'après
/// leur date de début. Une affectation entamée avant la période mais qui
/// déborde dedans (poste de nuit) va en semaine 1 : ses heures comptent au
/// total même si le regroupement par jour ne l'affiche nulle part.
pub fn split_weeks<'a>(
    assignments: &'a [Assignment],
    period: &BiweekPeriod,
) -> (Vec<&'a Assignment>, Vec<&'a Assignment>) {
    let period_start = Utc.from_utc_datetime(&period.start.and_time(NaiveTime::MIN));
    let mut week1 = Vec::new();
    let mut week2 = Vec::new();
    for a in assignments {
        let d = a.start.date_naive();
        if a.end <= period_start || d >= period.end {
            continue;
        }
        if d < period.week2.start {
            week1.push(a);
        } else {
            week2.push(a);
        }
    }
    (week1, week2)
}

/// Regroupe par index de jour (0..=6) relatif à `week_start`, d'après la date
/// de début uniquement : un poste de nuit ne crée pas de seconde entrée le
/// lendemain. Chaque seau est trié par instant de début.
pub fn bucket_by_day<'a>(
    assignments: &[&'a Assignment],
    week_start: NaiveDate,
) -> BTreeMap<i64, Vec<&'a Assignment>> {
    let mut buckets: BTreeMap<i64, Vec<&'a Assignment>> = BTreeMap::new();
    for a in assignments {
        let idx = (a.start.date_naive() - week_start).num_days();
        if (0..=6).contains(&idx) {
            buckets.entry(idx).or_default().push(a);
        }
    }
    for bucket in buckets.values_mut() {
        bucket.sort_by_key(|a| a.start);
    }
    buckets
}

/// Total d'heures d'une liste d'affectations, arrondi à 2 décimales.
pub fn total_hours(assignments: &[&Assignment]) -> f64 {
    let seconds: i64 = assignments.iter().map(|a| a.duration_seconds()).sum();
    round2(seconds as f64 / 3600.0)
}

/// Total bi-hebdomadaire : somme des deux totaux de semaine déjà arrondis,
/// ré-arrondie. L'arrondi en deux temps peut dévier de ±0,01 par rapport à un
/// arrondi unique ; c'est le comportement attendu, à conserver.
pub fn biweek_total(week1: f64, week2: f64) -> f64 {
    round2(week1 + week2)
}

// égalité exacte arrondie au pair (0.125 -> 0.12), pas vers l'infini
fn round2(x: f64) -> f64 {
    (x * 100.0).round_ties_even() / 100.0
}
