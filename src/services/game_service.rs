//! Host actions and the views built from the resulting game.

use tracing::warn;
use uuid::Uuid;

use crate::{
    dto::{
        game::{
            CatalogResponse, HostView, LookupResponse, PlaybackView, PublicView, SongView,
            current_song,
        },
        host::ActionResponse,
    },
    error::ServiceError,
    services::lookup,
    state::{
        AppState, SharedState,
        game::{ChallengeRule, Difficulty, GameMode, GameState, RoundRule},
        state_machine::GameEvent,
        transitions::run_transition_with_broadcast,
    },
};

/// Host view of `game`, including the playback descriptor of the current song.
pub fn build_host_view(state: &AppState, game: &GameState) -> HostView {
    let playback = current_song(game, state.catalog()).and_then(|song| {
        let video_id = song.video_id.as_deref()?;
        match lookup::embed_url(state.config().search_host(), video_id) {
            Ok(url) => Some(PlaybackView {
                video_id: video_id.to_string(),
                embed_url: url.into(),
                stop_after_secs: state.config().preview_secs(),
            }),
            Err(err) => {
                warn!(song_id = %song.id, error = %err, "failed to build embed url");
                None
            }
        }
    });
    HostView::new(game, state.catalog(), playback)
}

/// Current game as seen by the host.
pub async fn host_view(state: &SharedState) -> HostView {
    let game = state.snapshot().await;
    build_host_view(state, &game)
}

/// Current game as seen by the audience.
pub async fn public_view(state: &SharedState) -> PublicView {
    state
        .read_game(|game| PublicView::new(game, state.catalog()))
        .await
}

/// Songs of the loaded catalog.
pub fn catalog_listing(state: &SharedState) -> CatalogResponse {
    let songs: Vec<SongView> = state.catalog().songs().map(SongView::from).collect();
    CatalogResponse {
        count: songs.len(),
        songs,
    }
}

/// Search link for the song being played.
pub async fn lookup_current_song(state: &SharedState) -> Result<LookupResponse, ServiceError> {
    let (song_id, search_hint) = state
        .read_game(|game| {
            current_song(game, state.catalog()).map(|s| (s.id.clone(), s.search_hint.clone()))
        })
        .await
        .ok_or_else(|| ServiceError::NotFound("no song is currently drawn".into()))?;

    let url = lookup::search_url(state.config().search_host(), &search_hint).map_err(|err| {
        ServiceError::Internal(format!("invalid search host: {err}"))
    })?;

    Ok(LookupResponse {
        song_id,
        search_hint,
        url: url.into(),
    })
}

/// Feed a host action through the state machine and describe the outcome.
pub async fn apply(state: &SharedState, event: GameEvent) -> ActionResponse {
    let outcome = run_transition_with_broadcast(state, event).await;
    ActionResponse {
        applied: outcome.applied(),
        reason: outcome.ignored.as_ref().map(ToString::to_string),
        game: build_host_view(state, &outcome.state),
    }
}

/// Draw the next song, optionally of a single difficulty.
pub async fn draw(state: &SharedState, difficulty: Option<Difficulty>) -> ActionResponse {
    apply(state, GameEvent::Draw { difficulty }).await
}

/// Disclose the current song.
pub async fn reveal(state: &SharedState) -> ActionResponse {
    apply(state, GameEvent::Reveal).await
}

/// Drop the current song on a participant's timeline.
pub async fn place(
    state: &SharedState,
    participant_id: Uuid,
    insert_index: usize,
) -> ActionResponse {
    apply(
        state,
        GameEvent::Place {
            participant_id,
            insert_index,
        },
    )
    .await
}

/// Settle the objection against the last placement.
pub async fn resolve_challenge(
    state: &SharedState,
    applied: bool,
    challenger_id: Option<Uuid>,
) -> ActionResponse {
    apply(
        state,
        GameEvent::ResolveChallenge {
            applied,
            challenger_id,
        },
    )
    .await
}

/// Add a player to an individual game.
pub async fn add_player(state: &SharedState, name: String) -> ActionResponse {
    apply(state, GameEvent::AddPlayer { name }).await
}

/// Rename a player or team.
pub async fn rename_participant(
    state: &SharedState,
    participant_id: Uuid,
    name: String,
) -> ActionResponse {
    apply(
        state,
        GameEvent::RenameParticipant {
            participant_id,
            name,
        },
    )
    .await
}

/// Throw the game away and start one in `mode`.
pub async fn switch_mode(state: &SharedState, mode: GameMode) -> ActionResponse {
    apply(state, GameEvent::SwitchMode(mode)).await
}

/// Change the teams-mode round rule.
pub async fn set_round_rule(state: &SharedState, rule: RoundRule) -> ActionResponse {
    apply(state, GameEvent::SetRoundRule(rule)).await
}

/// Pick the team allowed to place under the single rule.
pub async fn set_active_team(state: &SharedState, team_id: Uuid) -> ActionResponse {
    apply(state, GameEvent::SetActiveTeam(team_id)).await
}

/// Change the failed-challenge penalty.
pub async fn set_challenge_rule(state: &SharedState, rule: ChallengeRule) -> ActionResponse {
    apply(state, GameEvent::SetChallengeRule(rule)).await
}

/// Throw the game away and start over in the same mode.
pub async fn reset(state: &SharedState) -> ActionResponse {
    apply(state, GameEvent::Reset).await
}
