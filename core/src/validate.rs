//! Caller-side preconditions checked before any request is issued.

use thiserror::Error;

use crate::types::{CreateMission, CreateSpyCat, CreateTarget};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Name is required.")]
    MissingName,

    #[error("Breed is required.")]
    MissingBreed,

    #[error("Salary must be a non-negative amount.")]
    InvalidSalary,

    #[error("A mission needs at least one target with a name and a country.")]
    NoTargets,

    #[error("Target {position} needs both a name and a country.")]
    IncompleteTarget { position: usize },
}

pub fn validate_salary(salary: f64) -> Result<(), ValidationError> {
    if salary.is_finite() && salary >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::InvalidSalary)
    }
}

pub fn validate_new_cat(cat: &CreateSpyCat) -> Result<(), ValidationError> {
    if cat.name.trim().is_empty() {
        return Err(ValidationError::MissingName);
    }
    if cat.breed.trim().is_empty() {
        return Err(ValidationError::MissingBreed);
    }
    validate_salary(cat.salary)
}

fn is_complete(target: &CreateTarget) -> bool {
    !target.name.trim().is_empty() && !target.country.trim().is_empty()
}

/// A mission must carry at least one target, and every target needs a
/// name and a country. Positions in errors are 1-based.
pub fn validate_mission(mission: &CreateMission) -> Result<(), ValidationError> {
    if mission.targets.is_empty() {
        return Err(ValidationError::NoTargets);
    }
    match mission.targets.iter().position(|t| !is_complete(t)) {
        Some(index) => Err(ValidationError::IncompleteTarget {
            position: index + 1,
        }),
        None => Ok(()),
    }
}

/// Form flow: half-filled target rows are dropped, and the mission is
/// rejected only when nothing usable is left.
pub fn prepare_mission(drafts: Vec<CreateTarget>) -> Result<CreateMission, ValidationError> {
    let targets: Vec<CreateTarget> = drafts.into_iter().filter(is_complete).collect();
    if targets.is_empty() {
        return Err(ValidationError::NoTargets);
    }
    Ok(CreateMission { targets })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cat(name: &str, breed: &str, salary: f64) -> CreateSpyCat {
        CreateSpyCat {
            name: name.to_string(),
            years_of_experience: 4,
            breed: breed.to_string(),
            salary,
        }
    }

    #[test]
    fn new_cat_requires_name_breed_and_sane_salary() {
        assert_eq!(validate_new_cat(&cat("Tom", "Siamese", 1000.0)), Ok(()));
        assert_eq!(validate_new_cat(&cat(" ", "Siamese", 1.0)), Err(ValidationError::MissingName));
        assert_eq!(validate_new_cat(&cat("Tom", "", 1.0)), Err(ValidationError::MissingBreed));
        assert_eq!(validate_new_cat(&cat("Tom", "Siamese", -1.0)), Err(ValidationError::InvalidSalary));
        assert_eq!(
            validate_new_cat(&cat("Tom", "Siamese", f64::NAN)),
            Err(ValidationError::InvalidSalary)
        );
    }

    #[test]
    fn zero_salary_is_allowed() {
        assert_eq!(validate_salary(0.0), Ok(()));
    }

    #[test]
    fn empty_mission_is_rejected() {
        let mission = CreateMission { targets: vec![] };
        assert_eq!(validate_mission(&mission), Err(ValidationError::NoTargets));
    }

    #[test]
    fn blank_country_is_reported_by_position() {
        let mission = CreateMission {
            targets: vec![CreateTarget::new("Vault", "CH"), CreateTarget::new("Dock", "  ")],
        };
        assert_eq!(
            validate_mission(&mission),
            Err(ValidationError::IncompleteTarget { position: 2 })
        );
    }

    #[test]
    fn prepare_drops_blank_rows_and_keeps_order() {
        let mission = prepare_mission(vec![
            CreateTarget::new("", ""),
            CreateTarget::new("Vault", "CH").with_notes("north door"),
            CreateTarget::new("Dock", ""),
            CreateTarget::new("Tower", "FR"),
        ])
        .unwrap();
        let names: Vec<&str> = mission.targets.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["Vault", "Tower"]);
        assert_eq!(mission.targets[0].notes, "north door");
        assert_eq!(validate_mission(&mission), Ok(()));
    }

    #[test]
    fn prepare_rejects_when_every_row_is_blank() {
        let result = prepare_mission(vec![CreateTarget::new("Vault", ""), CreateTarget::new("", "CH")]);
        assert_eq!(result, Err(ValidationError::NoTargets));
    }
}
