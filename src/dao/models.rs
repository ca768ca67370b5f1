use std::collections::HashSet;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::state::{
    catalog::Catalog,
    game::{
        ChallengeOutcome, ChallengeRule, Deck, Difficulty, GameMode, GameState, LastResult,
        Participant, RoundRule, RoundState, Song, TimelineCard,
    },
};

/// Layout version written with every snapshot.
pub const SNAPSHOT_VERSION: u32 = 2;

/// Song record as found in catalog files.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SongEntity {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub year: i32,
    pub difficulty: Difficulty,
    /// Text used for the external video search.
    #[serde(alias = "youtubeQuery")]
    pub search_hint: String,
    #[serde(default, alias = "videoId")]
    pub video_id: Option<String>,
}

/// Persisted timeline card.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimelineCardEntity {
    pub song_id: String,
    pub year: i32,
}

/// Persisted player or team.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParticipantEntity {
    pub id: Uuid,
    pub name: String,
    pub score: u32,
    #[serde(default)]
    pub timeline: Vec<TimelineCardEntity>,
}

/// Persisted outcome of the last placement, challenge fields flattened.
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LastResultEntity {
    pub participant_id: Uuid,
    pub ok: bool,
    pub song_id: String,
    pub actual_year: i32,
    pub inserted_index: usize,
    #[serde(default)]
    pub challenged_by_id: Option<Uuid>,
    #[serde(default)]
    pub challenge_resolved: Option<bool>,
    #[serde(default)]
    pub challenge_succeeded: Option<bool>,
}

/// Whole-game snapshot as written by snapshot stores.
///
/// Fields added after the first layout are optional so older snapshots still
/// decode; [`migrate`] fills them in.
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameSnapshotEntity {
    #[serde(default)]
    pub version: Option<u32>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub saved_at: Option<OffsetDateTime>,
    #[serde(default)]
    pub mode: Option<GameMode>,
    pub participants: Vec<ParticipantEntity>,
    pub deck_song_ids: Vec<String>,
    pub used_song_ids: Vec<String>,
    #[serde(default)]
    pub current_song_id: Option<String>,
    #[serde(default)]
    pub revealed: bool,
    #[serde(default)]
    pub round_rule: Option<RoundRule>,
    #[serde(default)]
    pub active_team_id: Option<Uuid>,
    #[serde(default)]
    pub round_placed_team_ids: Option<Vec<Uuid>>,
    #[serde(default)]
    pub challenge_rule: Option<ChallengeRule>,
    #[serde(default)]
    pub last_result: Option<LastResultEntity>,
}

impl From<SongEntity> for Song {
    fn from(value: SongEntity) -> Self {
        Self {
            id: value.id,
            title: value.title,
            artist: value.artist,
            year: value.year,
            difficulty: value.difficulty,
            search_hint: value.search_hint,
            video_id: value.video_id.filter(|id| !id.trim().is_empty()),
        }
    }
}

impl From<&TimelineCard> for TimelineCardEntity {
    fn from(value: &TimelineCard) -> Self {
        Self {
            song_id: value.song_id.clone(),
            year: value.year,
        }
    }
}

impl From<TimelineCardEntity> for TimelineCard {
    fn from(value: TimelineCardEntity) -> Self {
        Self {
            song_id: value.song_id,
            year: value.year,
        }
    }
}

impl From<&Participant> for ParticipantEntity {
    fn from(value: &Participant) -> Self {
        Self {
            id: value.id,
            name: value.name.clone(),
            score: value.score,
            timeline: value.timeline.iter().map(Into::into).collect(),
        }
    }
}

impl From<ParticipantEntity> for Participant {
    fn from(value: ParticipantEntity) -> Self {
        Self {
            id: value.id,
            name: value.name,
            score: value.score,
            timeline: value.timeline.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<&LastResult> for LastResultEntity {
    fn from(value: &LastResult) -> Self {
        Self {
            participant_id: value.participant_id,
            ok: value.ok,
            song_id: value.song_id.clone(),
            actual_year: value.actual_year,
            inserted_index: value.inserted_index,
            challenged_by_id: value.challenge.as_ref().and_then(|c| c.challenger_id),
            challenge_resolved: Some(value.challenge_resolved()),
            challenge_succeeded: value.challenge.as_ref().map(|c| c.succeeded),
        }
    }
}

impl From<LastResultEntity> for LastResult {
    fn from(value: LastResultEntity) -> Self {
        let challenge = value
            .challenge_resolved
            .unwrap_or(false)
            .then(|| ChallengeOutcome {
                challenger_id: value.challenged_by_id,
                succeeded: value.challenge_succeeded.unwrap_or(false),
            });
        Self {
            participant_id: value.participant_id,
            ok: value.ok,
            song_id: value.song_id,
            actual_year: value.actual_year,
            inserted_index: value.inserted_index,
            challenge,
        }
    }
}

impl From<&GameState> for GameSnapshotEntity {
    fn from(value: &GameState) -> Self {
        Self {
            version: Some(SNAPSHOT_VERSION),
            saved_at: Some(OffsetDateTime::now_utc()),
            mode: Some(value.mode),
            participants: value.participants.iter().map(Into::into).collect(),
            deck_song_ids: value.deck.deck_song_ids.clone(),
            used_song_ids: value.deck.used_song_ids.clone(),
            current_song_id: value.deck.current_song_id.clone(),
            revealed: value.deck.revealed,
            round_rule: Some(value.round.round_rule),
            active_team_id: value.round.active_team_id,
            round_placed_team_ids: Some(value.round.round_placed_team_ids.iter().copied().collect()),
            challenge_rule: Some(value.challenge_rule),
            last_result: value.last_result.as_ref().map(Into::into),
        }
    }
}

/// Turn a stored snapshot of any layout version into a consistent [`GameState`].
///
/// Missing fields take their defaults: individual mode, single round rule, no
/// challenge penalty, no attempted teams, and in teams mode the first team as
/// the active one. Song ids the catalog no longer knows are dropped, and a
/// current song that is not part of the draw history is cleared together with
/// its reveal flag and placement result.
pub fn migrate(snapshot: GameSnapshotEntity, catalog: &Catalog) -> GameState {
    let mode = snapshot.mode.unwrap_or_default();
    let participants: Vec<Participant> =
        snapshot.participants.into_iter().map(Into::into).collect();
    let known_participants: HashSet<Uuid> = participants.iter().map(|p| p.id).collect();

    let used: IndexSet<String> = snapshot
        .used_song_ids
        .into_iter()
        .filter(|id| catalog.contains(id))
        .collect();
    let deck: IndexSet<String> = snapshot
        .deck_song_ids
        .into_iter()
        .filter(|id| catalog.contains(id) && !used.contains(id))
        .collect();

    let current_song_id = snapshot
        .current_song_id
        .filter(|id| used.contains(id.as_str()));
    let revealed = current_song_id.is_some() && snapshot.revealed;
    let last_result = snapshot
        .last_result
        .filter(|_| current_song_id.is_some())
        .filter(|last| known_participants.contains(&last.participant_id))
        .map(LastResult::from);

    let active_team_id = match mode {
        GameMode::Teams => snapshot
            .active_team_id
            .filter(|id| known_participants.contains(id))
            .or_else(|| participants.first().map(|p| p.id)),
        GameMode::Individual => None,
    };
    let round_placed_team_ids = snapshot
        .round_placed_team_ids
        .unwrap_or_default()
        .into_iter()
        .filter(|id| known_participants.contains(id))
        .collect();

    GameState {
        mode,
        participants,
        deck: Deck {
            deck_song_ids: deck.into_iter().collect(),
            used_song_ids: used.into_iter().collect(),
            current_song_id,
            revealed,
        },
        round: RoundState {
            round_rule: snapshot.round_rule.unwrap_or_default(),
            active_team_id,
            round_placed_team_ids,
        },
        last_result,
        challenge_rule: snapshot.challenge_rule.unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};
    use serde_json::json;

    use super::*;
    use crate::state::{
        catalog::test_catalog,
        state_machine::{GameEvent, TransitionContext, transition},
    };

    #[test]
    fn legacy_snapshot_gets_defaults() {
        let catalog = test_catalog();
        let player = Uuid::new_v4();
        let raw = json!({
            "participants": [{ "id": player, "name": "P", "score": 2, "timeline": [] }],
            "deck_song_ids": ["b", "c"],
            "used_song_ids": ["a"],
            "current_song_id": "a",
            "revealed": true
        });

        let snapshot: GameSnapshotEntity = serde_json::from_value(raw).unwrap();
        let state = migrate(snapshot, &catalog);

        assert_eq!(state.mode, GameMode::Individual);
        assert_eq!(state.round.round_rule, RoundRule::Single);
        assert_eq!(state.challenge_rule, ChallengeRule::NoPenalty);
        assert!(state.round.round_placed_team_ids.is_empty());
        assert_eq!(state.round.active_team_id, None);
        assert_eq!(state.deck.current_song_id.as_deref(), Some("a"));
        assert!(state.deck.revealed);
        assert_eq!(state.participants[0].score, 2);
    }

    #[test]
    fn teams_snapshot_without_active_team_uses_the_first_team() {
        let catalog = test_catalog();
        let (first, second) = (Uuid::new_v4(), Uuid::new_v4());
        let raw = json!({
            "mode": "teams",
            "participants": [
                { "id": first, "name": "Team 1", "score": 0 },
                { "id": second, "name": "Team 2", "score": 0 }
            ],
            "deck_song_ids": ["a"],
            "used_song_ids": []
        });

        let state = migrate(serde_json::from_value(raw).unwrap(), &catalog);
        assert_eq!(state.mode, GameMode::Teams);
        assert_eq!(state.round.active_team_id, Some(first));
    }

    #[test]
    fn unknown_and_inconsistent_ids_are_healed() {
        let catalog = test_catalog();
        let raw = json!({
            "participants": [],
            "deck_song_ids": ["a", "gone", "b", "a"],
            "used_song_ids": ["b", "missing"],
            "current_song_id": "c",
            "revealed": true,
            "round_placed_team_ids": [Uuid::new_v4()]
        });

        let state = migrate(serde_json::from_value(raw).unwrap(), &catalog);
        assert_eq!(state.deck.deck_song_ids, ["a"]);
        assert_eq!(state.deck.used_song_ids, ["b"]);
        assert_eq!(state.deck.current_song_id, None);
        assert!(!state.deck.revealed);
        assert!(state.round.round_placed_team_ids.is_empty());
    }

    #[test]
    fn snapshot_of_a_played_game_migrates_back_to_the_same_state() {
        let catalog = test_catalog();
        let mut rng = StdRng::seed_from_u64(11);
        let ctx = TransitionContext {
            catalog: &catalog,
            team_count: 2,
            team_name_prefix: "Team",
        };
        let state = GameState::fresh_teams(&catalog, &mut rng, 2, "Team");
        let team = state.participants[0].id;
        let state = transition(&state, GameEvent::Draw { difficulty: None }, &ctx, &mut rng).unwrap();
        let state = transition(
            &state,
            GameEvent::Place {
                participant_id: team,
                insert_index: 0,
            },
            &ctx,
            &mut rng,
        )
        .unwrap();
        let state = transition(
            &state,
            GameEvent::ResolveChallenge {
                applied: true,
                challenger_id: None,
            },
            &ctx,
            &mut rng,
        )
        .unwrap();

        let encoded = serde_json::to_string(&GameSnapshotEntity::from(&state)).unwrap();
        let decoded: GameSnapshotEntity = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded.version, Some(SNAPSHOT_VERSION));
        assert_eq!(migrate(decoded, &catalog), state);
    }

    #[test]
    fn catalog_entity_accepts_original_field_names() {
        let raw = json!({
            "id": "k1",
            "title": "Gee",
            "artist": "Girls' Generation",
            "year": 2009,
            "difficulty": "easy",
            "youtubeQuery": "Girls Generation Gee MV",
            "videoId": ""
        });
        let song: Song = serde_json::from_value::<SongEntity>(raw).unwrap().into();
        assert_eq!(song.search_hint, "Girls Generation Gee MV");
        assert_eq!(song.video_id, None);
    }
}
