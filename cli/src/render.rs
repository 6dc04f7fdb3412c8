//! Terminal output: plain tables by default, pretty JSON with `--json`.

use serde::Serialize;
use serde_json::json;
use spycat_core::format::{format_currency, format_date};
use spycat_core::roster::MissionOverview;
use spycat_core::{HealthStatus, SpyCat, Target};

use crate::commands::CliError;

pub struct Output {
    pub json: bool,
}

impl Output {
    pub fn raw<T: Serialize + ?Sized>(&self, value: &T) {
        match serde_json::to_string_pretty(value) {
            Ok(text) => println!("{text}"),
            Err(err) => eprintln!("error: could not render output: {err}"),
        }
    }

    pub fn done(&self, message: &str) {
        if self.json {
            self.raw(&json!({ "ok": true, "message": message }));
        } else {
            println!("{message}");
        }
    }

    pub fn health(&self, status: &HealthStatus, base_url: &str) {
        if self.json {
            self.raw(status);
        } else if status.is_healthy {
            println!("Backend at {base_url} is healthy.");
        } else {
            println!("Backend at {base_url} is unreachable.");
        }
    }

    pub fn cats(&self, cats: &[SpyCat]) {
        if self.json {
            self.raw(cats);
            return;
        }
        if cats.is_empty() {
            println!("No spy cats yet.");
            return;
        }
        println!("Active Spy Cats ({})", cats.len());
        println!(
            "{:>5}  {:<20} {:<18} {:>10} {:>14}",
            "ID", "NAME", "BREED", "EXPERIENCE", "SALARY"
        );
        for cat in cats {
            println!(
                "{:>5}  {:<20} {:<18} {:>10} {:>14}",
                cat.id,
                cat.name,
                cat.breed,
                format!("{} yrs", cat.years_of_experience),
                format_currency(cat.salary)
            );
        }
    }

    pub fn missions(&self, overviews: &[MissionOverview]) {
        if overviews.is_empty() {
            println!("No missions yet.");
            return;
        }
        for overview in overviews {
            let mission = &overview.mission;
            let state = if mission.complete { "Complete" } else { "In Progress" };
            let agent = match (&overview.cat, mission.cat_id) {
                (Some(cat), _) => format!("{} ({})", cat.name, cat.breed),
                (None, Some(id)) => format!("cat #{id}"),
                (None, None) => "unassigned".to_string(),
            };
            println!(
                "Mission #{}  [{state}]  {}  created {}",
                mission.id,
                overview.progress_label(),
                format_date(&mission.created_at)
            );
            println!("  agent: {agent}");
            for target in &mission.targets {
                println!("  {}", target_line(target));
            }
        }
    }
}

pub fn target_line(target: &Target) -> String {
    let state = if target.complete { "Complete" } else { "Pending" };
    let mut line = format!(
        "target #{} {} ({}) [{state}]",
        target.id, target.name, target.country
    );
    if !target.notes.is_empty() {
        line.push_str(" - ");
        line.push_str(&target.notes);
    }
    line
}

pub fn report(err: &CliError) {
    eprintln!("error: {err}");
    if let Some(details) = err.details() {
        eprintln!("  details: {details}");
    }
}
