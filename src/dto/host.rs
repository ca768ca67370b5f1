//! Request and response bodies of the host control endpoints.

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::game::HostView,
    state::game::{ChallengeRule, Difficulty, GameMode, RoundRule},
};

/// Draw the next song.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct DrawRequest {
    /// Restrict the draw to one difficulty; any difficulty when absent.
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
}

/// Drop the current song on a timeline slot.
#[derive(Debug, Deserialize, ToSchema)]
pub struct PlaceRequest {
    pub participant_id: Uuid,
    /// Slot in the participant's year-sorted timeline, `0..=len`.
    pub insert_index: usize,
}

/// Settle the objection against the last placement.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ChallengeRequest {
    /// `false` when nobody objects.
    pub applied: bool,
    /// Objecting team; the first other team when absent.
    #[serde(default)]
    pub challenger_id: Option<Uuid>,
}

/// New player.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct AddPlayerRequest {
    #[validate(length(max = 64))]
    pub name: String,
}

/// New display name for a player or team.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct RenameRequest {
    #[validate(length(max = 64))]
    pub name: String,
}

/// Start over in the given mode.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SwitchModeRequest {
    pub mode: GameMode,
}

/// Change the teams-mode round rule.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RoundRuleRequest {
    pub round_rule: RoundRule,
}

/// Pick the team allowed to place under the single rule.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ActiveTeamRequest {
    pub team_id: Uuid,
}

/// Change the penalty for failed challenges.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ChallengeRuleRequest {
    pub challenge_rule: ChallengeRule,
}

/// Outcome of a host action together with the resulting game.
#[skip_serializing_none]
#[derive(Debug, Serialize, ToSchema)]
pub struct ActionResponse {
    /// `false` when the action was not allowed in the current state.
    pub applied: bool,
    /// Why the action was ignored.
    pub reason: Option<String>,
    pub game: HostView,
}
