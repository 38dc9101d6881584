#![forbid(unsafe_code)]
use anyhow::{anyhow, Result};
use chrono::{NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
use clap::{Parser, Subcommand};
use renfort::{
    calendar, io,
    model::{AdminId, AssignmentId, Registry, RequestId, StaffId, UnitId},
    scheduler::{
        NewAssignment, NewRecurringAssignment, NewRecurringRequest, NewRequest, RulePattern,
        Scheduler,
    },
    storage::{JsonStorage, Storage},
};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// Ancre historique des périodes bi-hebdomadaires (un vendredi).
const BIWEEK_ANCHOR: &str = "2025-12-26";

/// CLI minimaliste de planification de renfort (sans base de données)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON du registre
    #[arg(long, global = true, default_value = "registry.json")]
    data: String,

    /// Identifiant de l'administrateur attaché aux créations
    #[arg(long, global = true, default_value = "admin")]
    admin: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ajouter un membre du personnel
    AddStaff {
        #[arg(long)]
        name: String,
        #[arg(long)]
        phone: Option<String>,
    },

    /// Ajouter une unité cliente
    AddUnit {
        #[arg(long)]
        name: String,
        #[arg(long)]
        address: Option<String>,
    },

    /// Importer du personnel depuis un CSV
    ImportStaff {
        #[arg(long)]
        csv: String,
    },

    /// Importer des unités depuis un CSV
    ImportUnits {
        #[arg(long)]
        csv: String,
    },

    /// Créer une demande de couverture datée
    CreateRequest {
        #[arg(long)]
        unit: String,
        #[arg(long)]
        coordinator: String,
        #[arg(long, default_value_t = 1)]
        staff_needed: u32,
        /// YYYY-MM-DD
        #[arg(long)]
        date: String,
        /// HH:MM
        #[arg(long)]
        start: String,
        /// HH:MM (si <= start, fin reportée au lendemain)
        #[arg(long)]
        end: String,
        #[arg(long)]
        notes: Option<String>,
    },

    /// Créer une affectation datée (refusée en cas de chevauchement)
    CreateAssignment {
        #[arg(long)]
        staff: String,
        #[arg(long)]
        unit: String,
        #[arg(long)]
        request: Option<String>,
        /// YYYY-MM-DD
        #[arg(long)]
        date: String,
        /// HH:MM
        #[arg(long)]
        start: String,
        /// HH:MM
        #[arg(long)]
        end: String,
        #[arg(long)]
        notes: Option<String>,
    },

    /// Annuler une demande (soft delete)
    CancelRequest {
        #[arg(long)]
        id: String,
    },

    /// Annuler une affectation (soft delete)
    CancelAssignment {
        #[arg(long)]
        id: String,
    },

    /// Créer une règle récurrente de demande
    AddRecurringRequest {
        #[arg(long)]
        unit: String,
        #[arg(long)]
        coordinator: String,
        #[arg(long, default_value_t = 1)]
        staff_needed: u32,
        /// HH:MM
        #[arg(long)]
        start_time: String,
        /// HH:MM
        #[arg(long)]
        end_time: String,
        /// Codes jours, ex. "MO,WE,FR"
        #[arg(long)]
        days: String,
        /// YYYY-MM-DD
        #[arg(long)]
        start_date: String,
        /// YYYY-MM-DD (absent => jusqu'à modification)
        #[arg(long)]
        end_date: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },

    /// Créer une règle récurrente d'affectation
    AddRecurringAssignment {
        #[arg(long)]
        staff: String,
        #[arg(long)]
        unit: String,
        /// HH:MM
        #[arg(long)]
        start_time: String,
        /// HH:MM
        #[arg(long)]
        end_time: String,
        /// Codes jours, ex. "MO,WE,FR"
        #[arg(long)]
        days: String,
        /// YYYY-MM-DD
        #[arg(long)]
        start_date: String,
        /// YYYY-MM-DD (absent => jusqu'à modification)
        #[arg(long)]
        end_date: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },

    /// Matérialiser les occurrences des règles de demande actives
    GenerateRequests {
        #[arg(long, default_value_t = 28)]
        horizon_days: u32,
    },

    /// Matérialiser les occurrences des règles d'affectation actives
    GenerateAssignments {
        #[arg(long, default_value_t = 28)]
        horizon_days: u32,
    },

    /// Afficher la période bi-hebdomadaire contenant une date
    Biweek {
        /// YYYY-MM-DD (défaut : aujourd'hui)
        #[arg(long)]
        date: Option<String>,
        /// Restreindre à un membre (affiche aussi les totaux d'heures)
        #[arg(long)]
        staff: Option<String>,
        /// Restreindre à une unité
        #[arg(long)]
        unit: Option<String>,
        /// Premier jour de semaine (code deux lettres)
        #[arg(long, default_value = "FR")]
        week_start: String,
        /// Date d'ancrage des périodes de 14 jours
        #[arg(long, default_value = BIWEEK_ANCHOR)]
        anchor: String,
    },

    /// État de remplissage d'une demande
    RequestStatus {
        #[arg(long)]
        id: String,
        /// Écrit le statut recalculé sur la fiche
        #[arg(long)]
        apply: bool,
    },

    /// Lister les affectations et optionnellement exporter le registre
    List {
        #[arg(long)]
        out_json: Option<String>,
    },
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    renfort::recur::parse_date(s).map_err(|e| anyhow!(e))
}

fn parse_weekday(code: &str) -> Result<Weekday> {
    match code {
        "MO" => Ok(Weekday::Mon),
        "TU" => Ok(Weekday::Tue),
        "WE" => Ok(Weekday::Wed),
        "TH" => Ok(Weekday::Thu),
        "FR" => Ok(Weekday::Fri),
        "SA" => Ok(Weekday::Sat),
        "SU" => Ok(Weekday::Sun),
        _ => Err(anyhow!("unknown day code: {code}")),
    }
}

fn split_codes(s: &str) -> Vec<String> {
    s.split(',')
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .collect()
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let actor = AdminId::new(&cli.admin);
    let storage = JsonStorage::open(&cli.data)?;
    let mut scheduler = match storage.load() {
        Ok(r) => Scheduler::from_registry(r),
        Err(_) => Scheduler::new(),
    };

    match cli.cmd {
        Commands::AddStaff { name, phone } => {
            let mut staff = renfort::model::Staff::new(name);
            staff.phone = phone;
            println!("{}", staff.id.as_str());
            scheduler.add_staff(vec![staff]);
            storage.save(scheduler.registry())?;
        }
        Commands::AddUnit { name, address } => {
            let mut unit = renfort::model::Unit::new(name);
            unit.address = address;
            println!("{}", unit.id.as_str());
            scheduler.add_units(vec![unit]);
            storage.save(scheduler.registry())?;
        }
        Commands::ImportStaff { csv } => {
            let staff = io::import_staff_csv(csv)?;
            scheduler.add_staff(staff);
            storage.save(scheduler.registry())?;
        }
        Commands::ImportUnits { csv } => {
            let units = io::import_units_csv(csv)?;
            scheduler.add_units(units);
            storage.save(scheduler.registry())?;
        }
        Commands::CreateRequest {
            unit,
            coordinator,
            staff_needed,
            date,
            start,
            end,
            notes,
        } => {
            let id = scheduler.create_request(
                &actor,
                NewRequest {
                    unit_id: UnitId::new(unit),
                    coordinator_name: coordinator,
                    staff_needed,
                    date: parse_date(&date)?,
                    start_time: start,
                    end_time: end,
                    status: None,
                    notes,
                },
            )?;
            println!("{}", id.as_str());
            storage.save(scheduler.registry())?;
        }
        Commands::CreateAssignment {
            staff,
            unit,
            request,
            date,
            start,
            end,
            notes,
        } => {
            let id = scheduler.create_assignment(
                &actor,
                NewAssignment {
                    staff_id: StaffId::new(staff),
                    unit_id: UnitId::new(unit),
                    request_id: request.map(RequestId::new),
                    date: parse_date(&date)?,
                    start_time: start,
                    end_time: end,
                    status: None,
                    notes,
                },
            )?;
            println!("{}", id.as_str());
            storage.save(scheduler.registry())?;
        }
        Commands::CancelRequest { id } => {
            scheduler.cancel_request(&RequestId::new(id))?;
            storage.save(scheduler.registry())?;
        }
        Commands::CancelAssignment { id } => {
            scheduler.cancel_assignment(&AssignmentId::new(id))?;
            storage.save(scheduler.registry())?;
        }
        Commands::AddRecurringRequest {
            unit,
            coordinator,
            staff_needed,
            start_time,
            end_time,
            days,
            start_date,
            end_date,
            notes,
        } => {
            let id = scheduler.create_recurring_request(
                &actor,
                NewRecurringRequest {
                    unit_id: UnitId::new(unit),
                    coordinator_name: coordinator,
                    staff_needed,
                    pattern: RulePattern {
                        start_time,
                        end_time,
                        days: split_codes(&days),
                        start_date: parse_date(&start_date)?,
                        end_date: end_date.as_deref().map(parse_date).transpose()?,
                        is_active: true,
                    },
                    notes,
                },
            )?;
            println!("{}", id.as_str());
            storage.save(scheduler.registry())?;
        }
        Commands::AddRecurringAssignment {
            staff,
            unit,
            start_time,
            end_time,
            days,
            start_date,
            end_date,
            notes,
        } => {
            let id = scheduler.create_recurring_assignment(
                &actor,
                NewRecurringAssignment {
                    staff_id: StaffId::new(staff),
                    unit_id: UnitId::new(unit),
                    pattern: RulePattern {
                        start_time,
                        end_time,
                        days: split_codes(&days),
                        start_date: parse_date(&start_date)?,
                        end_date: end_date.as_deref().map(parse_date).transpose()?,
                        is_active: true,
                    },
                    notes,
                },
            )?;
            println!("{}", id.as_str());
            storage.save(scheduler.registry())?;
        }
        Commands::GenerateRequests { horizon_days } => {
            let today = Utc::now().date_naive();
            let report = scheduler.expand_request_occurrences(&actor, horizon_days, today);
            let (created, skipped, _) = report.counts();
            println!("Generated {created}. Skipped {skipped} existing.");
            storage.save(scheduler.registry())?;
        }
        Commands::GenerateAssignments { horizon_days } => {
            let today = Utc::now().date_naive();
            let report = scheduler.expand_assignment_occurrences(&actor, horizon_days, today);
            let (created, skipped, conflicts) = report.counts();
            println!("Generated {created}. Skipped {skipped}. Conflicts {conflicts} (overlaps).");
            storage.save(scheduler.registry())?;
        }
        Commands::Biweek {
            date,
            staff,
            unit,
            week_start,
            anchor,
        } => {
            let qdate = match date {
                Some(d) => parse_date(&d)?,
                None => Utc::now().date_naive(),
            };
            let first_day = parse_weekday(&week_start)?;
            let anchor = parse_date(&anchor)?;
            print_biweek(
                &scheduler,
                qdate,
                anchor,
                first_day,
                staff.map(StaffId::new),
                unit.map(UnitId::new),
            )?;
        }
        Commands::RequestStatus { id, apply } => {
            let rid = RequestId::new(id);
            let view = scheduler.request_status(&rid)?;
            println!(
                "filled={} satisfied={} status={}",
                view.filled,
                view.satisfied,
                view.status.as_str()
            );
            if apply {
                scheduler.recompute_and_persist_status(&rid)?;
                storage.save(scheduler.registry())?;
            }
        }
        Commands::List { out_json } => {
            if let Some(path) = out_json {
                io::export_registry_json(path, scheduler.registry())?;
            }
            for a in &scheduler.registry().assignments {
                println!(
                    "{} | {} → {} | staff {} | {}",
                    a.id.as_str(),
                    a.start.to_rfc3339(),
                    a.end.to_rfc3339(),
                    a.staff_id.as_str(),
                    a.status.as_str()
                );
            }
        }
    }

    Ok(())
}

fn print_biweek(
    scheduler: &Scheduler,
    qdate: NaiveDate,
    anchor: NaiveDate,
    first_day: Weekday,
    staff: Option<StaffId>,
    unit: Option<UnitId>,
) -> Result<()> {
    let period = calendar::biweek_period(qdate, anchor, first_day);
    println!("biweek {} → {} (exclusive)", period.start, period.end);

    let registry: &Registry = scheduler.registry();
    let period_start = Utc.from_utc_datetime(&period.start.and_time(NaiveTime::MIN));
    let period_end = Utc.from_utc_datetime(&period.end.and_time(NaiveTime::MIN));

    let assignments: Vec<renfort::model::Assignment> = registry
        .assignments
        .iter()
        .filter(|a| a.status != renfort::model::AssignmentStatus::Canceled)
        .filter(|a| a.start < period_end && a.end > period_start)
        .filter(|a| staff.as_ref().map_or(true, |s| &a.staff_id == s))
        .filter(|a| unit.as_ref().map_or(true, |u| &a.unit_id == u))
        .cloned()
        .collect();

    let (week1, week2) = calendar::split_weeks(&assignments, &period);
    for (label, range, list) in [
        ("week1", period.week1, &week1),
        ("week2", period.week2, &week2),
    ] {
        println!("{label} {} → {}", range.start, range.end);
        let buckets = calendar::bucket_by_day(list, range.start);
        for (idx, day) in buckets {
            for a in day {
                println!(
                    "  day{idx} {} | {} → {} | staff {}",
                    a.start.date_naive(),
                    a.start.time(),
                    a.end.time(),
                    a.staff_id.as_str()
                );
            }
        }
    }

    if staff.is_some() {
        let w1 = calendar::total_hours(&week1);
        let w2 = calendar::total_hours(&week2);
        println!(
            "hours week1={w1:.2} week2={w2:.2} biweek={:.2}",
            calendar::biweek_total(w1, w2)
        );
    }
    Ok(())
}
