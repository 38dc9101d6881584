use crate::model::{Registry, Staff, Unit};
use anyhow::{bail, Context};
use csv::ReaderBuilder;
use std::fs;
use std::path::Path;

/// Import de personnel depuis CSV: header `full_name[,phone][,is_active]`
pub fn import_staff_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Staff>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let full_name = rec.get(0).context("missing full_name")?.trim();
        if full_name.is_empty() {
            bail!("invalid staff row (empty full_name)");
        }
        let mut staff = Staff::new(full_name.to_string());
        if let Some(phone) = rec.get(1) {
            let phone = phone.trim();
            if !phone.is_empty() {
                staff.phone = Some(phone.to_string());
            }
        }
        if let Some(flag) = rec.get(2) {
            let flag = flag.trim();
            if !flag.is_empty() {
                staff.is_active = parse_bool(flag)
                    .with_context(|| format!("invalid is_active value for {full_name}"))?;
            }
        }
        out.push(staff);
    }
    Ok(out)
}

/// Import d'unités depuis CSV: header `unit_name[,address][,is_active]`
pub fn import_units_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Unit>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let unit_name = rec.get(0).context("missing unit_name")?.trim();
        if unit_name.is_empty() {
            bail!("invalid unit row (empty unit_name)");
        }
        let mut unit = Unit::new(unit_name.to_string());
        if let Some(address) = rec.get(1) {
            let address = address.trim();
            if !address.is_empty() {
                unit.address = Some(address.to_string());
            }
        }
        if let Some(flag) = rec.get(2) {
            let flag = flag.trim();
            if !flag.is_empty() {
                unit.is_active = parse_bool(flag)
                    .with_context(|| format!("invalid is_active value for {unit_name}"))?;
            }
        }
        out.push(unit);
    }
    Ok(out)
}

fn parse_bool(s: &str) -> anyhow::Result<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "y" | "oui" => Ok(true),
        "false" | "0" | "no" | "n" | "non" => Ok(false),
        _ => bail!("expected boolean"),
    }
}

/// Export JSON du registre (jolie mise en forme)
pub fn export_registry_json<P: AsRef<Path>>(path: P, registry: &Registry) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(registry)?;
    fs::write(path, s)?;
    Ok(())
}
