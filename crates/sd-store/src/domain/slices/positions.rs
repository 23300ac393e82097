use serde::Serialize;
use shared_types::{EntityId, Position};

use crate::domain::collection::{remove_by_id, replace_by_id};
use crate::domain::status::Lifecycle;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PositionsState {
    pub positions: Vec<Position>,
    pub lifecycle: Lifecycle,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PositionsOutcome {
    Fetched(Vec<Position>),
    Added(Position),
    Updated(Position),
    Deleted(EntityId),
}

impl PositionsState {
    pub(crate) fn apply(&mut self, outcome: PositionsOutcome) {
        match outcome {
            PositionsOutcome::Fetched(positions) => self.positions = positions,
            PositionsOutcome::Added(position) => self.positions.push(position),
            PositionsOutcome::Updated(position) => {
                replace_by_id(&mut self.positions, position);
            }
            PositionsOutcome::Deleted(id) => {
                remove_by_id(&mut self.positions, &id);
            }
        }
    }
}
