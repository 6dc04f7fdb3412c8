//! Joins missions with the agents assigned to them.
//!
//! The missions endpoint returns `cat_id` only, so views that show who runs
//! a mission fetch the agent list separately and join locally.

use std::collections::{HashMap, HashSet};

use crate::types::{Mission, SpyCat};

#[derive(Debug, Clone, PartialEq)]
pub struct MissionOverview {
    pub mission: Mission,
    pub cat: Option<SpyCat>,
    pub completed_targets: usize,
    pub total_targets: usize,
}

impl MissionOverview {
    pub fn progress_label(&self) -> String {
        format!(
            "{}/{} targets complete",
            self.completed_targets, self.total_targets
        )
    }
}

/// Pair every mission with its agent. An agent embedded by the backend wins
/// over the lookup; missions whose agent is gone keep `cat: None`.
pub fn join_missions(missions: Vec<Mission>, cats: &[SpyCat]) -> Vec<MissionOverview> {
    let by_id: HashMap<i64, &SpyCat> = cats.iter().map(|cat| (cat.id, cat)).collect();
    missions
        .into_iter()
        .map(|mission| {
            let cat = mission.cat.clone().or_else(|| {
                mission
                    .cat_id
                    .and_then(|id| by_id.get(&id).map(|cat| (*cat).clone()))
            });
            MissionOverview {
                completed_targets: mission.completed_targets(),
                total_targets: mission.targets.len(),
                cat,
                mission,
            }
        })
        .collect()
}

/// Agents free to take a mission: not the assignee of any incomplete one.
pub fn available_cats<'a>(cats: &'a [SpyCat], missions: &[Mission]) -> Vec<&'a SpyCat> {
    let busy: HashSet<i64> = missions
        .iter()
        .filter(|mission| !mission.complete)
        .filter_map(|mission| mission.cat_id)
        .collect();
    cats.iter().filter(|cat| !busy.contains(&cat.id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Target;

    fn cat(id: i64, name: &str) -> SpyCat {
        SpyCat {
            id,
            name: name.to_string(),
            years_of_experience: 2,
            breed: "Bengal".to_string(),
            salary: 500.0,
        }
    }

    fn mission(id: i64, cat_id: Option<i64>, complete: bool, done: &[bool]) -> Mission {
        Mission {
            id,
            cat_id,
            complete,
            created_at: "2024-03-01T10:00:00".to_string(),
            targets: done
                .iter()
                .enumerate()
                .map(|(i, complete)| Target {
                    id: id * 10 + i as i64,
                    name: format!("t{i}"),
                    country: "PL".to_string(),
                    notes: String::new(),
                    complete: *complete,
                    mission_id: id,
                })
                .collect(),
            cat: None,
        }
    }

    #[test]
    fn join_looks_up_assigned_agent() {
        let cats = [cat(1, "Tom"), cat(2, "Luna")];
        let overviews = join_missions(
            vec![mission(10, Some(2), false, &[true, false]), mission(11, None, false, &[false])],
            &cats,
        );
        assert_eq!(overviews[0].cat.as_ref().map(|c| c.name.as_str()), Some("Luna"));
        assert_eq!(overviews[0].progress_label(), "1/2 targets complete");
        assert!(overviews[1].cat.is_none());
    }

    #[test]
    fn embedded_agent_wins_and_missing_agent_is_none() {
        let mut embedded = mission(10, Some(1), false, &[]);
        embedded.cat = Some(cat(1, "Embedded Tom"));
        let orphan = mission(11, Some(99), false, &[]);

        let overviews = join_missions(vec![embedded, orphan], &[cat(1, "Tom")]);
        assert_eq!(overviews[0].cat.as_ref().unwrap().name, "Embedded Tom");
        assert!(overviews[1].cat.is_none());
    }

    #[test]
    fn agents_on_finished_missions_are_available_again() {
        let cats = [cat(1, "Tom"), cat(2, "Luna"), cat(3, "Felix")];
        let missions = [
            mission(10, Some(1), false, &[false]),
            mission(11, Some(2), true, &[true]),
        ];
        let free: Vec<i64> = available_cats(&cats, &missions).iter().map(|c| c.id).collect();
        assert_eq!(free, [2, 3]);
    }
}
