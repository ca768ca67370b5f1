//! Read projections of the game served to host and audience screens.

use serde::Serialize;
use serde_with::skip_serializing_none;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::state::{
    catalog::Catalog,
    game::{
        ChallengeRule, Difficulty, GameMode, GameState, LastResult, Participant, RoundRule, Song,
        TimelineCard,
    },
    state_machine::{can_place, default_challenger},
};

/// Timeline card with its catalog metadata.
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CardView {
    pub song_id: String,
    pub year: i32,
    /// Missing when the song left the catalog.
    pub title: Option<String>,
    pub artist: Option<String>,
}

impl CardView {
    fn new(card: &TimelineCard, catalog: &Catalog) -> Self {
        let song = catalog.get(&card.song_id);
        Self {
            song_id: card.song_id.clone(),
            year: card.year,
            title: song.map(|s| s.title.clone()),
            artist: song.map(|s| s.artist.clone()),
        }
    }
}

fn timeline_view(participant: &Participant, catalog: &Catalog) -> Vec<CardView> {
    participant
        .sorted_timeline()
        .iter()
        .map(|card| CardView::new(card, catalog))
        .collect()
}

/// Player or team as seen by the host.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ParticipantView {
    pub id: Uuid,
    pub name: String,
    pub score: u32,
    /// Whether a card may be dropped on this timeline right now.
    pub can_place: bool,
    /// Year-sorted timeline.
    pub timeline: Vec<CardView>,
}

/// Songs still in the deck for each difficulty.
#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct DifficultyCounts {
    pub easy: usize,
    pub normal: usize,
    pub hard: usize,
}

/// Deck progress counters.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DeckView {
    pub remaining: usize,
    pub used: usize,
    pub remaining_by_difficulty: DifficultyCounts,
}

impl DeckView {
    fn new(game: &GameState, catalog: &Catalog) -> Self {
        let count = |difficulty| game.deck.remaining(catalog, Some(difficulty));
        Self {
            remaining: game.deck.remaining(catalog, None),
            used: game.deck.used_song_ids.len(),
            remaining_by_difficulty: DifficultyCounts {
                easy: count(Difficulty::Easy),
                normal: count(Difficulty::Normal),
                hard: count(Difficulty::Hard),
            },
        }
    }
}

/// Song awaiting placement, as seen by the host.
///
/// Title, artist and year stay hidden until the song is revealed; the search
/// hint is always present so the host can look the song up.
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CurrentSongView {
    pub id: String,
    pub difficulty: Difficulty,
    pub search_hint: String,
    pub revealed: bool,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub year: Option<i32>,
}

impl CurrentSongView {
    fn new(song: &Song, revealed: bool) -> Self {
        let disclosed = |value: &str| revealed.then(|| value.to_string());
        Self {
            id: song.id.clone(),
            difficulty: song.difficulty,
            search_hint: song.search_hint.clone(),
            revealed,
            title: disclosed(&song.title),
            artist: disclosed(&song.artist),
            year: revealed.then_some(song.year),
        }
    }
}

/// Outcome of a challenge.
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ChallengeView {
    /// Absent when no valid team objected.
    pub challenger_id: Option<Uuid>,
    pub succeeded: bool,
}

/// Result of the last placement on the current song.
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LastResultView {
    pub participant_id: Uuid,
    pub participant_name: Option<String>,
    pub ok: bool,
    pub song_id: String,
    pub actual_year: i32,
    pub inserted_index: usize,
    pub challenge_resolved: bool,
    pub challenge: Option<ChallengeView>,
}

impl LastResultView {
    fn new(last: &LastResult, game: &GameState) -> Self {
        Self {
            participant_id: last.participant_id,
            participant_name: game.participant(last.participant_id).map(|p| p.name.clone()),
            ok: last.ok,
            song_id: last.song_id.clone(),
            actual_year: last.actual_year,
            inserted_index: last.inserted_index,
            challenge_resolved: last.challenge_resolved(),
            challenge: last.challenge.as_ref().map(|c| ChallengeView {
                challenger_id: c.challenger_id,
                succeeded: c.succeeded,
            }),
        }
    }
}

/// Teams-mode round settings.
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RoundView {
    pub round_rule: RoundRule,
    pub active_team_id: Option<Uuid>,
    pub round_placed_team_ids: Vec<Uuid>,
    pub challenge_rule: ChallengeRule,
    /// Team preselected to object against the unresolved last placement.
    pub default_challenger_id: Option<Uuid>,
}

impl RoundView {
    fn new(game: &GameState) -> Option<Self> {
        (game.mode == GameMode::Teams).then(|| Self {
            round_rule: game.round.round_rule,
            active_team_id: game.effective_active_team(),
            round_placed_team_ids: game.round.round_placed_team_ids.iter().copied().collect(),
            challenge_rule: game.challenge_rule,
            default_challenger_id: default_challenger(game),
        })
    }
}

/// How the host screen should play the current song.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PlaybackView {
    pub video_id: String,
    pub embed_url: String,
    /// The player pauses on its own after this many seconds.
    pub stop_after_secs: u64,
}

/// Everything the host screen renders.
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HostView {
    pub mode: GameMode,
    pub participants: Vec<ParticipantView>,
    pub deck: DeckView,
    pub current_song: Option<CurrentSongView>,
    pub last_result: Option<LastResultView>,
    /// Present in teams mode only.
    pub round: Option<RoundView>,
    pub playback: Option<PlaybackView>,
}

impl HostView {
    /// Project `game` for the host; `playback` is resolved by the caller.
    pub fn new(game: &GameState, catalog: &Catalog, playback: Option<PlaybackView>) -> Self {
        Self {
            mode: game.mode,
            participants: game
                .participants
                .iter()
                .map(|p| ParticipantView {
                    id: p.id,
                    name: p.name.clone(),
                    score: p.score,
                    can_place: can_place(game, p.id),
                    timeline: timeline_view(p, catalog),
                })
                .collect(),
            deck: DeckView::new(game, catalog),
            current_song: current_song(game, catalog)
                .map(|song| CurrentSongView::new(song, game.deck.revealed)),
            last_result: game
                .last_result
                .as_ref()
                .map(|last| LastResultView::new(last, game)),
            round: RoundView::new(game),
            playback,
        }
    }
}

/// Current song looked up in the catalog.
pub fn current_song<'a>(game: &GameState, catalog: &'a Catalog) -> Option<&'a Song> {
    game.deck
        .current_song_id
        .as_deref()
        .and_then(|id| catalog.get(id))
}

/// Player or team as seen by the audience.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PublicParticipantView {
    pub id: Uuid,
    pub name: String,
    pub score: u32,
    pub timeline: Vec<CardView>,
}

/// Current song as seen by the audience; nothing but the reveal flag until revealed.
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PublicSongView {
    pub revealed: bool,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub year: Option<i32>,
}

/// Everything an audience screen renders.
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PublicView {
    pub mode: GameMode,
    pub participants: Vec<PublicParticipantView>,
    pub remaining: usize,
    pub current_song: Option<PublicSongView>,
    pub last_result: Option<LastResultView>,
    pub active_team_id: Option<Uuid>,
}

impl PublicView {
    /// Project `game` for the audience.
    pub fn new(game: &GameState, catalog: &Catalog) -> Self {
        let revealed = game.deck.revealed;
        Self {
            mode: game.mode,
            participants: game
                .participants
                .iter()
                .map(|p| PublicParticipantView {
                    id: p.id,
                    name: p.name.clone(),
                    score: p.score,
                    timeline: timeline_view(p, catalog),
                })
                .collect(),
            remaining: game.deck.deck_song_ids.len(),
            current_song: current_song(game, catalog).map(|song| PublicSongView {
                revealed,
                title: revealed.then(|| song.title.clone()),
                artist: revealed.then(|| song.artist.clone()),
                year: revealed.then_some(song.year),
            }),
            last_result: game
                .last_result
                .as_ref()
                .map(|last| LastResultView::new(last, game)),
            active_team_id: game.effective_active_team(),
        }
    }
}

/// Catalog entry.
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SongView {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub year: i32,
    pub difficulty: Difficulty,
    pub search_hint: String,
    pub video_id: Option<String>,
}

impl From<&Song> for SongView {
    fn from(song: &Song) -> Self {
        Self {
            id: song.id.clone(),
            title: song.title.clone(),
            artist: song.artist.clone(),
            year: song.year,
            difficulty: song.difficulty,
            search_hint: song.search_hint.clone(),
            video_id: song.video_id.clone(),
        }
    }
}

/// Full song catalog listing.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CatalogResponse {
    pub count: usize,
    pub songs: Vec<SongView>,
}

/// Search link for the current song.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LookupResponse {
    pub song_id: String,
    pub search_hint: String,
    pub url: String,
}
