use std::io::{self, BufRead, IsTerminal, Write};

use spycat_core::roster::{available_cats, join_missions};
use spycat_core::validate::prepare_mission;
use spycat_core::{ApiError, CreateSpyCat, SpyCatClient, UpdateTarget};
use thiserror::Error;
use tracing::info;

use crate::render::{self, Output};
use crate::{CatsCommand, MissionsCommand, TargetsCommand};

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Health probe failed before a mutation was attempted.
    #[error("Backend server is not responding")]
    Unavailable { details: String },

    /// Refused locally, mirroring the actions the admin pages disable.
    #[error("{0}")]
    Refused(String),
}

impl CliError {
    pub fn details(&self) -> Option<&str> {
        match self {
            CliError::Api(err) => err.details(),
            CliError::Unavailable { details } => Some(details),
            CliError::Refused(_) => None,
        }
    }
}

/// Deletions need `--yes` or an interactive "y".
fn confirm(question: &str, assume_yes: bool) -> Result<(), CliError> {
    if assume_yes {
        return Ok(());
    }
    let stdin = io::stdin();
    if !stdin.is_terminal() {
        return Err(CliError::Refused(format!("{question} Pass --yes to confirm.")));
    }
    confirm_from(question, stdin.lock())
}

fn confirm_from(question: &str, mut input: impl BufRead) -> Result<(), CliError> {
    eprint!("{question} [y/N] ");
    let _ = io::stderr().flush();
    let mut answer = String::new();
    input
        .read_line(&mut answer)
        .map_err(|e| CliError::Refused(format!("Could not read confirmation: {e}")))?;
    match answer.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Ok(()),
        _ => Err(CliError::Refused("Deletion cancelled.".to_string())),
    }
}

/// Mutations are only attempted against a backend that answers.
async fn ensure_backend(client: &SpyCatClient) -> Result<(), CliError> {
    let status = client.check_health().await;
    if status.is_healthy {
        return Ok(());
    }
    let details = status.error.unwrap_or_else(|| {
        format!("Make sure the backend is running on {}", client.config().base_url())
    });
    Err(CliError::Unavailable { details })
}

pub async fn health(client: &SpyCatClient, out: &Output) -> Result<(), CliError> {
    let status = client.check_health().await;
    out.health(&status, client.config().base_url());
    match status.error {
        Some(details) => Err(CliError::Unavailable { details }),
        None => Ok(()),
    }
}

pub async fn cats(client: &SpyCatClient, out: &Output, command: CatsCommand) -> Result<(), CliError> {
    match command {
        CatsCommand::List => {
            let cats = client.list_cats().await?;
            out.cats(&cats);
        }
        CatsCommand::Get { id } => {
            let cat = client.get_cat(id).await?;
            out.cats(std::slice::from_ref(&cat));
        }
        CatsCommand::Create {
            name,
            years,
            breed,
            salary,
        } => {
            ensure_backend(client).await?;
            let input = CreateSpyCat {
                name,
                years_of_experience: years,
                breed,
                salary,
            };
            let cat = client.create_cat(&input).await?;
            info!(id = cat.id, "spy cat recruited");
            out.cats(std::slice::from_ref(&cat));
        }
        CatsCommand::SetSalary { id, salary } => {
            ensure_backend(client).await?;
            let cat = client.update_cat_salary(id, salary).await?;
            out.cats(std::slice::from_ref(&cat));
        }
        CatsCommand::Delete { id, yes } => {
            confirm(&format!("Delete spy cat {id}?"), yes)?;
            ensure_backend(client).await?;
            client.delete_cat(id).await?;
            out.done(&format!("Spy cat {id} deleted."));
        }
    }
    Ok(())
}

pub async fn missions(
    client: &SpyCatClient,
    out: &Output,
    command: MissionsCommand,
) -> Result<(), CliError> {
    match command {
        MissionsCommand::List => {
            // Agents are fetched after missions, never reused from earlier.
            let missions = client.list_missions().await?;
            let cats = client.list_cats().await?;
            if out.json {
                out.raw(&missions);
            } else {
                let overviews = join_missions(missions, &cats);
                out.missions(&overviews);
            }
        }
        MissionsCommand::Get { id } => {
            let mission = client.get_mission(id).await?;
            let cats = client.list_cats().await?;
            if out.json {
                out.raw(&mission);
            } else {
                out.missions(&join_missions(vec![mission], &cats));
            }
        }
        MissionsCommand::Create { targets } => {
            let input = prepare_mission(targets).map_err(|e| CliError::Refused(e.to_string()))?;
            ensure_backend(client).await?;
            let mission = client.create_mission(&input).await?;
            info!(id = mission.id, targets = mission.targets.len(), "mission created");
            if out.json {
                out.raw(&mission);
            } else {
                out.missions(&join_missions(vec![mission], &[]));
            }
        }
        MissionsCommand::Assign { mission_id, cat_id } => {
            ensure_backend(client).await?;
            let cats = client.list_cats().await?;
            let missions = client.list_missions().await?;
            let known = cats.iter().any(|cat| cat.id == cat_id);
            let free = available_cats(&cats, &missions)
                .iter()
                .any(|cat| cat.id == cat_id);
            if known && !free {
                return Err(CliError::Refused(format!(
                    "Spy cat {cat_id} is already on an active mission."
                )));
            }
            let mission = client.assign_mission(mission_id, cat_id).await?;
            if out.json {
                out.raw(&mission);
            } else {
                out.missions(&join_missions(vec![mission], &cats));
            }
        }
        MissionsCommand::Delete { id, yes } => {
            ensure_backend(client).await?;
            let mission = client.get_mission(id).await?;
            if !mission.can_delete() {
                return Err(CliError::Refused(format!(
                    "Mission {id} is assigned to a spy cat and cannot be deleted."
                )));
            }
            confirm(&format!("Delete mission {id}?"), yes)?;
            client.delete_mission(id).await?;
            out.done(&format!("Mission {id} deleted."));
        }
    }
    Ok(())
}

pub async fn targets(
    client: &SpyCatClient,
    out: &Output,
    command: TargetsCommand,
) -> Result<(), CliError> {
    match command {
        TargetsCommand::Update {
            id,
            notes,
            complete,
        } => {
            if notes.is_none() && !complete {
                return Err(CliError::Refused(
                    "Nothing to update: pass --notes and/or --complete.".to_string(),
                ));
            }
            ensure_backend(client).await?;
            let update = UpdateTarget {
                notes,
                complete: complete.then_some(true),
            };
            let target = client.update_target(id, &update).await?;
            if out.json {
                out.raw(&target);
            } else {
                println!("{}", render::target_line(&target));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, ErrorKind};
    use std::net::TcpListener;

    use spycat_core::{ClientConfig, CreateTarget, ValidationError};

    use super::*;

    #[tokio::test]
    async fn blank_mission_is_refused_before_contacting_the_backend() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.set_nonblocking(true).unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let client = SpyCatClient::new(ClientConfig::new(&base_url)).unwrap();

        let command = MissionsCommand::Create {
            targets: vec![CreateTarget::new("", ""), CreateTarget::new("Vault", " ")],
        };
        let err = missions(&client, &Output { json: false }, command)
            .await
            .unwrap_err();

        assert!(matches!(err, CliError::Refused(_)));
        assert_eq!(err.to_string(), ValidationError::NoTargets.to_string());
        let accepted = listener.accept().map(|_| ()).map_err(|e| e.kind());
        assert_eq!(accepted, Err(ErrorKind::WouldBlock));
    }

    #[test]
    fn confirmation_accepts_only_yes() {
        assert!(confirm_from("Delete spy cat 1?", Cursor::new("y\n")).is_ok());
        assert!(confirm_from("Delete spy cat 1?", Cursor::new("YES\n")).is_ok());
        let err = confirm_from("Delete spy cat 1?", Cursor::new("\n")).unwrap_err();
        assert_eq!(err.to_string(), "Deletion cancelled.");
        assert!(confirm_from("Delete spy cat 1?", Cursor::new("")).is_err());
    }

    #[test]
    fn yes_flag_skips_the_prompt() {
        assert!(confirm("Delete mission 2?", true).is_ok());
    }
}
