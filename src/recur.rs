//! Motifs de récurrence : heure sans date, masque de jours, fenêtre de validité.
//!
//! La normalisation minuit (fin <= début => fin reportée au lendemain) vit ici
//! et est partagée par la création manuelle et l'expansion automatique.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc, Weekday};
use serde::{Deserialize, Serialize};

/// Heure murale sans date, stockée « HH:MM ».
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(NaiveTime);

impl TimeOfDay {
    /// Parse « HH:MM » ; toute autre forme est rejetée.
    pub fn parse(s: &str) -> Result<Self, String> {
        NaiveTime::parse_from_str(s, "%H:%M")
            .map(Self)
            .map_err(|_| format!("invalid time (expected HH:MM): {s}"))
    }

    pub fn time(&self) -> NaiveTime {
        self.0
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = String;
    fn try_from(s: String) -> Result<Self, String> {
        Self::parse(&s)
    }
}

impl From<TimeOfDay> for String {
    fn from(t: TimeOfDay) -> String {
        t.0.format("%H:%M").to_string()
    }
}

const DAY_CODES: [(&str, u8); 7] = [
    ("MO", 1),
    ("TU", 2),
    ("WE", 4),
    ("TH", 8),
    ("FR", 16),
    ("SA", 32),
    ("SU", 64),
];

/// Masque de jours actifs : Lun=1, Mar=2, Mer=4, Jeu=8, Ven=16, Sam=32, Dim=64.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WeekdayMask(pub u8);

impl WeekdayMask {
    /// Construit un masque depuis des codes deux lettres (« MO », « TU », ...).
    pub fn from_codes<S: AsRef<str>>(codes: &[S]) -> Result<Self, String> {
        let mut mask = 0u8;
        for code in codes {
            let code = code.as_ref();
            let bit = DAY_CODES
                .iter()
                .find(|(c, _)| *c == code)
                .map(|(_, b)| *b)
                .ok_or_else(|| format!("unknown day code: {code}"))?;
            mask |= bit;
        }
        Ok(Self(mask))
    }

    /// Codes deux lettres des jours actifs, dans l'ordre Lun..Dim.
    pub fn codes(&self) -> Vec<&'static str> {
        DAY_CODES
            .iter()
            .filter(|(_, bit)| self.0 & bit != 0)
            .map(|(code, _)| *code)
            .collect()
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.0 & (1u8 << day.num_days_from_monday()) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

/// Gabarit partagé par les règles récurrentes de demande et d'affectation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recurrence {
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    pub days: WeekdayMask,
    pub start_date: NaiveDate,
    /// None => jusqu'à modification (règle ouverte).
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl Recurrence {
    /// La règle produit-elle une occurrence à la date `d` ?
    pub fn fires_on(&self, d: NaiveDate) -> bool {
        self.is_active
            && self.start_date <= d
            && self.end_date.map_or(true, |end| d <= end)
            && self.days.contains(d.weekday())
    }

    /// Fenêtre concrète [début, fin) pour la date `d`, avec report minuit.
    pub fn window(&self, d: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
        combine_window(d, self.start_time, self.end_time)
    }
}

/// Combine une date et une heure murale en instant UTC.
pub fn combine(d: NaiveDate, t: TimeOfDay) -> DateTime<Utc> {
    Utc.from_utc_datetime(&NaiveDateTime::new(d, t.time()))
}

/// Fenêtre [début, fin) d'une date : si fin <= début, la fin est reportée
/// d'exactement un jour (poste de nuit passant minuit).
pub fn combine_window(
    d: NaiveDate,
    start: TimeOfDay,
    end: TimeOfDay,
) -> (DateTime<Utc>, DateTime<Utc>) {
    let start_dt = combine(d, start);
    let mut end_dt = combine(d, end);
    if end_dt <= start_dt {
        end_dt += Duration::days(1);
    }
    (start_dt, end_dt)
}

/// Parse une date « YYYY-MM-DD ».
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| format!("invalid date (expected YYYY-MM-DD): {s}"))
}
