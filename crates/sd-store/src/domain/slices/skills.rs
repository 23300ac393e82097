use serde::Serialize;
use shared_types::{EntityId, Skill};

use crate::domain::collection::{remove_by_id, replace_by_id};
use crate::domain::status::Lifecycle;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SkillsState {
    pub skills: Vec<Skill>,
    pub lifecycle: Lifecycle,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SkillsOutcome {
    Fetched(Vec<Skill>),
    Added(Skill),
    Updated(Skill),
    Deleted(EntityId),
}

impl SkillsState {
    pub(crate) fn apply(&mut self, outcome: SkillsOutcome) {
        match outcome {
            SkillsOutcome::Fetched(skills) => self.skills = skills,
            SkillsOutcome::Added(skill) => self.skills.push(skill),
            SkillsOutcome::Updated(skill) => {
                replace_by_id(&mut self.skills, skill);
            }
            SkillsOutcome::Deleted(id) => {
                remove_by_id(&mut self.skills, &id);
            }
        }
    }
}
