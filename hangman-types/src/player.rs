use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::PlayerId;

/// Public view of a room member. `is_master` is derived from the room's
/// master id at the time the view is produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PlayerInfo {
    pub id: PlayerId,
    pub name: String,
    pub points: u32,
    pub is_master: bool,
    pub joined_at: String, // ISO 8601 string
}
