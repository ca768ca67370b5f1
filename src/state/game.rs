use indexmap::IndexSet;
use rand::{Rng, seq::SliceRandom};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::state::catalog::Catalog;

/// Identifier of a song inside the catalog.
pub type SongId = String;

/// Difficulty bucket a song belongs to, used to filter draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Widely known hits.
    Easy,
    /// Regular catalog entries.
    Normal,
    /// Deep cuts.
    Hard,
}

impl Difficulty {
    /// Every difficulty, in display order.
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];
}

/// Whether participants play alone or as teams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    /// Free-for-all: the host adds players by name.
    #[default]
    Individual,
    /// Fixed set of teams with round and challenge rules.
    Teams,
}

/// How many teams may place the same drawn song.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RoundRule {
    /// Only the active team places each song.
    #[default]
    Single,
    /// Every team gets one attempt per song.
    All,
}

/// Penalty applied to a challenger whose objection fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeRule {
    /// Failed challenges cost nothing.
    #[default]
    NoPenalty,
    /// Failed challenges cost the challenger one point (never below zero).
    FailMinusOne,
}

/// Immutable catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Song {
    /// Unique catalog key.
    pub id: SongId,
    /// Song title.
    pub title: String,
    /// Performing artist.
    pub artist: String,
    /// Release year, the value players have to place.
    pub year: i32,
    /// Difficulty bucket.
    pub difficulty: Difficulty,
    /// Free text used to build the external video search.
    pub search_hint: String,
    /// Embeddable video identifier, when the catalog knows one.
    pub video_id: Option<String>,
}

/// A song card sitting on a participant's timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineCard {
    /// Song the card stands for.
    pub song_id: SongId,
    /// Release year copied at placement time.
    pub year: i32,
}

/// A player (individual mode) or a team (teams mode).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    /// Stable identifier.
    pub id: Uuid,
    /// Display name, editable by the host.
    pub name: String,
    /// Points earned so far.
    pub score: u32,
    /// Placed cards, in storage order.
    pub timeline: Vec<TimelineCard>,
}

impl Participant {
    /// Create a participant with no points and an empty timeline.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            score: 0,
            timeline: Vec::new(),
        }
    }

    /// Year-sorted view of the timeline, recomputed on every call.
    pub fn sorted_timeline(&self) -> Vec<TimelineCard> {
        crate::state::judge::sorted_by_year(&self.timeline)
    }

    /// Insert `card` at `index` of the sorted view and store the result.
    ///
    /// Callers guarantee `index <= timeline.len()`.
    pub(crate) fn insert_card(&mut self, index: usize, card: TimelineCard) {
        let mut sorted = self.sorted_timeline();
        sorted.insert(index, card);
        self.timeline = sorted;
    }

    pub(crate) fn award_point(&mut self) {
        self.score = self.score.saturating_add(1);
    }

    pub(crate) fn deduct_point(&mut self) {
        self.score = self.score.saturating_sub(1);
    }
}

/// Draw order, history and the song currently on the table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Deck {
    /// Songs not drawn yet, in shuffled order.
    pub deck_song_ids: Vec<SongId>,
    /// Songs already drawn, in draw order.
    pub used_song_ids: Vec<SongId>,
    /// Song awaiting placement or already revealed.
    pub current_song_id: Option<SongId>,
    /// Whether the current song's year is disclosed.
    pub revealed: bool,
}

impl Deck {
    /// Build a freshly shuffled deck holding every catalog song.
    pub fn shuffled<R: Rng + ?Sized>(catalog: &Catalog, rng: &mut R) -> Self {
        let mut deck_song_ids: Vec<SongId> = catalog.ids().cloned().collect();
        deck_song_ids.shuffle(rng);
        Self {
            deck_song_ids,
            ..Self::default()
        }
    }

    /// Position of the first remaining song matching `filter`, in deck order.
    pub fn next_candidate(&self, catalog: &Catalog, filter: Option<Difficulty>) -> Option<usize> {
        self.deck_song_ids
            .iter()
            .position(|id| catalog.matches(id, filter))
    }

    /// Number of remaining songs matching `filter`.
    pub fn remaining(&self, catalog: &Catalog, filter: Option<Difficulty>) -> usize {
        self.deck_song_ids
            .iter()
            .filter(|id| catalog.matches(id, filter))
            .count()
    }

    /// Move the song at `position` out of the deck and make it current.
    pub(crate) fn take(&mut self, position: usize) -> SongId {
        let id = self.deck_song_ids.remove(position);
        self.used_song_ids.push(id.clone());
        self.current_song_id = Some(id.clone());
        self.revealed = false;
        id
    }
}

/// Turn-taking state, only meaningful in teams mode.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RoundState {
    /// Active round rule.
    pub round_rule: RoundRule,
    /// Team allowed to place under [`RoundRule::Single`].
    pub active_team_id: Option<Uuid>,
    /// Teams that already attempted the current song under [`RoundRule::All`].
    pub round_placed_team_ids: IndexSet<Uuid>,
}

/// Resolution of a challenge raised against the last placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeOutcome {
    /// Team that objected, absent when the challenge was declined or invalid.
    pub challenger_id: Option<Uuid>,
    /// Whether the objection won the card.
    pub succeeded: bool,
}

/// Outcome of the most recent placement on the current song.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastResult {
    /// Participant who placed the card.
    pub participant_id: Uuid,
    /// Whether the placement was correct.
    pub ok: bool,
    /// Song that was placed.
    pub song_id: SongId,
    /// True release year of the song.
    pub actual_year: i32,
    /// Slot of the sorted timeline the card was dropped on.
    pub inserted_index: usize,
    /// Set once a challenge has been resolved.
    pub challenge: Option<ChallengeOutcome>,
}

impl LastResult {
    /// Whether a challenge against this placement has been settled.
    pub fn challenge_resolved(&self) -> bool {
        self.challenge.is_some()
    }
}

/// Aggregate root holding the whole game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    /// Individual or teams play.
    pub mode: GameMode,
    /// Players or teams, in display order.
    pub participants: Vec<Participant>,
    /// Draw order and the song on the table.
    pub deck: Deck,
    /// Teams-mode turn state.
    pub round: RoundState,
    /// Result of the last placement on the current song.
    pub last_result: Option<LastResult>,
    /// Penalty rule for failed challenges.
    pub challenge_rule: ChallengeRule,
}

impl GameState {
    /// Fresh individual game with no players and a shuffled deck.
    pub fn fresh_individual<R: Rng + ?Sized>(catalog: &Catalog, rng: &mut R) -> Self {
        Self {
            mode: GameMode::Individual,
            participants: Vec::new(),
            deck: Deck::shuffled(catalog, rng),
            round: RoundState::default(),
            last_result: None,
            challenge_rule: ChallengeRule::default(),
        }
    }

    /// Fresh teams game with `team_count` numbered teams, the first one active.
    pub fn fresh_teams<R: Rng + ?Sized>(
        catalog: &Catalog,
        rng: &mut R,
        team_count: usize,
        name_prefix: &str,
    ) -> Self {
        let participants: Vec<Participant> = (1..=team_count)
            .map(|n| Participant::new(format!("{name_prefix} {n}")))
            .collect();
        let active_team_id = participants.first().map(|team| team.id);

        Self {
            mode: GameMode::Teams,
            participants,
            deck: Deck::shuffled(catalog, rng),
            round: RoundState {
                active_team_id,
                ..RoundState::default()
            },
            last_result: None,
            challenge_rule: ChallengeRule::default(),
        }
    }

    /// Look up a participant by id.
    pub fn participant(&self, id: Uuid) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    pub(crate) fn participant_mut(&mut self, id: Uuid) -> Option<&mut Participant> {
        self.participants.iter_mut().find(|p| p.id == id)
    }

    /// Team allowed to place under the single rule: the explicit pick, else the first team.
    pub fn effective_active_team(&self) -> Option<Uuid> {
        if self.mode != GameMode::Teams {
            return None;
        }
        self.round
            .active_team_id
            .or_else(|| self.participants.first().map(|p| p.id))
    }
}
