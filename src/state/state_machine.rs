//! Host actions and the pure reducer that applies them to a [`GameState`].
//!
//! Every mutation of the game goes through [`transition`]: it never edits the
//! current state in place, it builds the complete next state or reports why the
//! action was ignored. Ignored actions are not failures; the host screen simply
//! does not react to them.

use rand::Rng;
use thiserror::Error;
use uuid::Uuid;

use crate::state::{
    catalog::Catalog,
    game::{
        ChallengeOutcome, ChallengeRule, Difficulty, GameMode, GameState, LastResult, Participant,
        RoundRule, SongId, TimelineCard,
    },
    judge::{SlotOutOfRange, insertion_index_for_year, judge},
};

/// Actions the host can trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// Draw the next song, optionally restricted to one difficulty.
    Draw {
        /// Only songs of this difficulty are candidates.
        difficulty: Option<Difficulty>,
    },
    /// Disclose the current song's year without judging anything.
    Reveal,
    /// Drop the current song on a participant's timeline.
    Place {
        /// Participant receiving the card.
        participant_id: Uuid,
        /// Slot of the participant's sorted timeline.
        insert_index: usize,
    },
    /// Settle an objection against the last placement (teams mode).
    ResolveChallenge {
        /// `false` when no team objects.
        applied: bool,
        /// Objecting team; defaults to the first team other than the one that placed.
        challenger_id: Option<Uuid>,
    },
    /// Add a player (individual mode).
    AddPlayer {
        /// Display name.
        name: String,
    },
    /// Rename a player or team.
    RenameParticipant {
        /// Participant to rename.
        participant_id: Uuid,
        /// New display name.
        name: String,
    },
    /// Start over in the given mode.
    SwitchMode(GameMode),
    /// Change the teams-mode round rule.
    SetRoundRule(RoundRule),
    /// Pick the team allowed to place under the single rule.
    SetActiveTeam(Uuid),
    /// Change the failed-challenge penalty.
    SetChallengeRule(ChallengeRule),
    /// Start over in the current mode.
    Reset,
}

impl GameEvent {
    /// Whether applying the event discards the previous game entirely.
    pub fn is_destructive(&self) -> bool {
        matches!(self, GameEvent::SwitchMode(_) | GameEvent::Reset)
    }
}

/// Reason an action left the game untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Ignored {
    /// No song has been drawn.
    #[error("no song is currently drawn")]
    NoCurrentSong,
    /// No remaining song satisfies the filter.
    #[error("no song left to draw (filter: {filter:?})")]
    DeckExhausted {
        /// Filter used for the draw.
        filter: Option<Difficulty>,
    },
    /// The current song is already revealed.
    #[error("the current song is already revealed")]
    AlreadyRevealed,
    /// No participant carries that id.
    #[error("participant `{0}` not found")]
    UnknownParticipant(Uuid),
    /// The participant may not place the current song.
    #[error("participant `{0}` cannot place the current song")]
    NotEligible(Uuid),
    /// The drop slot does not exist.
    #[error(transparent)]
    SlotOutOfRange(#[from] SlotOutOfRange),
    /// The current song is missing from the catalog.
    #[error("song `{0}` is not in the catalog")]
    UnknownSong(SongId),
    /// Nothing has been placed on the current song.
    #[error("there is no placement to challenge")]
    NoPlacementToChallenge,
    /// The challenge for the last placement was already settled.
    #[error("the challenge for the last placement is already resolved")]
    ChallengeAlreadyResolved,
    /// The action only makes sense in another mode.
    #[error("operation requires {0:?} mode")]
    RequiresMode(GameMode),
    /// The supplied name is blank.
    #[error("name must not be empty")]
    EmptyName,
}

/// Read-only inputs the reducer needs besides the state itself.
#[derive(Debug, Clone, Copy)]
pub struct TransitionContext<'a> {
    /// Song catalog backing the deck.
    pub catalog: &'a Catalog,
    /// Number of teams created when switching to teams mode.
    pub team_count: usize,
    /// Prefix of generated team names.
    pub team_name_prefix: &'a str,
}

/// Whether `participant_id` may place the current song right now.
///
/// Revealing the year does not block placement; only a completed placement
/// under the single rule (or in individual mode), or a team's own attempt
/// under the all rule, does.
pub fn can_place(state: &GameState, participant_id: Uuid) -> bool {
    if state.deck.current_song_id.is_none() || state.participant(participant_id).is_none() {
        return false;
    }

    match state.mode {
        GameMode::Individual => state.last_result.is_none(),
        GameMode::Teams => match state.round.round_rule {
            RoundRule::Single => {
                state.last_result.is_none()
                    && state.effective_active_team() == Some(participant_id)
            }
            RoundRule::All => !state.round.round_placed_team_ids.contains(&participant_id),
        },
    }
}

/// Build a fresh game in `mode`.
pub fn fresh_state<R: Rng + ?Sized>(
    mode: GameMode,
    ctx: &TransitionContext<'_>,
    rng: &mut R,
) -> GameState {
    match mode {
        GameMode::Individual => GameState::fresh_individual(ctx.catalog, rng),
        GameMode::Teams => {
            GameState::fresh_teams(ctx.catalog, rng, ctx.team_count, ctx.team_name_prefix)
        }
    }
}

/// Compute the state that results from applying `event` to `state`.
pub fn transition<R: Rng + ?Sized>(
    state: &GameState,
    event: GameEvent,
    ctx: &TransitionContext<'_>,
    rng: &mut R,
) -> Result<GameState, Ignored> {
    let mut next = state.clone();

    match event {
        GameEvent::Draw { difficulty } => {
            let position = next
                .deck
                .next_candidate(ctx.catalog, difficulty)
                .ok_or(Ignored::DeckExhausted { filter: difficulty })?;
            next.deck.take(position);
            next.last_result = None;
            next.round.round_placed_team_ids.clear();
        }
        GameEvent::Reveal => {
            if next.deck.current_song_id.is_none() {
                return Err(Ignored::NoCurrentSong);
            }
            if next.deck.revealed {
                return Err(Ignored::AlreadyRevealed);
            }
            next.deck.revealed = true;
        }
        GameEvent::Place {
            participant_id,
            insert_index,
        } => place(&mut next, participant_id, insert_index, ctx.catalog)?,
        GameEvent::ResolveChallenge {
            applied,
            challenger_id,
        } => resolve_challenge(&mut next, applied, challenger_id)?,
        GameEvent::AddPlayer { name } => {
            if next.mode != GameMode::Individual {
                return Err(Ignored::RequiresMode(GameMode::Individual));
            }
            let name = name.trim();
            if name.is_empty() {
                return Err(Ignored::EmptyName);
            }
            next.participants.push(Participant::new(name));
        }
        GameEvent::RenameParticipant {
            participant_id,
            name,
        } => {
            let participant = next
                .participant_mut(participant_id)
                .ok_or(Ignored::UnknownParticipant(participant_id))?;
            participant.name = name;
        }
        GameEvent::SwitchMode(mode) => next = fresh_state(mode, ctx, rng),
        GameEvent::Reset => next = fresh_state(state.mode, ctx, rng),
        GameEvent::SetRoundRule(rule) => {
            require_teams(&next)?;
            next.round.active_team_id = next.effective_active_team();
            next.round.round_rule = rule;
            next.round.round_placed_team_ids.clear();
        }
        GameEvent::SetActiveTeam(team_id) => {
            require_teams(&next)?;
            if next.participant(team_id).is_none() {
                return Err(Ignored::UnknownParticipant(team_id));
            }
            next.round.active_team_id = Some(team_id);
        }
        GameEvent::SetChallengeRule(rule) => {
            require_teams(&next)?;
            next.challenge_rule = rule;
        }
    }

    Ok(next)
}

/// Team preselected to object against the last placement: the first team other
/// than the one that placed. `None` when there is nothing left to challenge.
pub fn default_challenger(state: &GameState) -> Option<Uuid> {
    if state.mode != GameMode::Teams {
        return None;
    }
    let last = state.last_result.as_ref().filter(|l| !l.challenge_resolved())?;
    state
        .participants
        .iter()
        .find(|p| p.id != last.participant_id)
        .map(|p| p.id)
}

fn require_teams(state: &GameState) -> Result<(), Ignored> {
    if state.mode == GameMode::Teams {
        Ok(())
    } else {
        Err(Ignored::RequiresMode(GameMode::Teams))
    }
}

fn place(
    state: &mut GameState,
    participant_id: Uuid,
    insert_index: usize,
    catalog: &Catalog,
) -> Result<(), Ignored> {
    let song_id = state
        .deck
        .current_song_id
        .clone()
        .ok_or(Ignored::NoCurrentSong)?;
    if state.participant(participant_id).is_none() {
        return Err(Ignored::UnknownParticipant(participant_id));
    }
    if !can_place(state, participant_id) {
        return Err(Ignored::NotEligible(participant_id));
    }
    let actual_year = catalog
        .get(&song_id)
        .map(|song| song.year)
        .ok_or_else(|| Ignored::UnknownSong(song_id.clone()))?;

    let participant = state
        .participant_mut(participant_id)
        .ok_or(Ignored::UnknownParticipant(participant_id))?;
    let ok = judge(&participant.timeline, insert_index, actual_year)?;

    if ok {
        participant.insert_card(
            insert_index,
            TimelineCard {
                song_id: song_id.clone(),
                year: actual_year,
            },
        );
        participant.award_point();
    } else {
        participant.deduct_point();
    }

    state.deck.revealed = true;
    state.last_result = Some(LastResult {
        participant_id,
        ok,
        song_id,
        actual_year,
        inserted_index: insert_index,
        challenge: None,
    });
    if state.mode == GameMode::Teams && state.round.round_rule == RoundRule::All {
        state.round.round_placed_team_ids.insert(participant_id);
    }

    Ok(())
}

fn resolve_challenge(
    state: &mut GameState,
    applied: bool,
    challenger_id: Option<Uuid>,
) -> Result<(), Ignored> {
    require_teams(state)?;
    let last = state
        .last_result
        .clone()
        .ok_or(Ignored::NoPlacementToChallenge)?;
    if last.challenge_resolved() {
        return Err(Ignored::ChallengeAlreadyResolved);
    }

    if !applied {
        set_challenge(state, None, false);
        return Ok(());
    }

    let challenger = challenger_id
        .or_else(|| default_challenger(state))
        .filter(|id| *id != last.participant_id && state.participant(*id).is_some());
    let Some(challenger) = challenger else {
        set_challenge(state, None, false);
        return Ok(());
    };

    // A challenge wins exactly when the original placement was wrong.
    let succeeded = !last.ok;
    let penalty = state.challenge_rule;
    if let Some(team) = state.participant_mut(challenger) {
        if succeeded {
            let index = insertion_index_for_year(&team.timeline, last.actual_year);
            team.insert_card(
                index,
                TimelineCard {
                    song_id: last.song_id.clone(),
                    year: last.actual_year,
                },
            );
            team.award_point();
        } else if penalty == ChallengeRule::FailMinusOne {
            team.deduct_point();
        }
    }

    set_challenge(state, Some(challenger), succeeded);
    Ok(())
}

fn set_challenge(state: &mut GameState, challenger_id: Option<Uuid>, succeeded: bool) {
    if let Some(last) = state.last_result.as_mut() {
        last.challenge = Some(ChallengeOutcome {
            challenger_id,
            succeeded,
        });
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::state::{
        catalog::test_catalog,
        game::{Deck, RoundState},
    };

    fn ctx(catalog: &Catalog) -> TransitionContext<'_> {
        TransitionContext {
            catalog,
            team_count: 3,
            team_name_prefix: "Team",
        }
    }

    fn apply(state: &GameState, catalog: &Catalog, event: GameEvent) -> GameState {
        let mut rng = StdRng::seed_from_u64(42);
        transition(state, event, &ctx(catalog), &mut rng).unwrap()
    }

    fn try_apply(
        state: &GameState,
        catalog: &Catalog,
        event: GameEvent,
    ) -> Result<GameState, Ignored> {
        let mut rng = StdRng::seed_from_u64(42);
        transition(state, event, &ctx(catalog), &mut rng)
    }

    /// Game with a fixed deck order and the given participants.
    fn game(mode: GameMode, deck: &[&str], names: &[&str]) -> GameState {
        let participants: Vec<Participant> = names.iter().map(|n| Participant::new(*n)).collect();
        let active_team_id = match mode {
            GameMode::Teams => participants.first().map(|p| p.id),
            GameMode::Individual => None,
        };
        GameState {
            mode,
            participants,
            deck: Deck {
                deck_song_ids: deck.iter().map(|id| id.to_string()).collect(),
                ..Deck::default()
            },
            round: RoundState {
                active_team_id,
                ..RoundState::default()
            },
            last_result: None,
            challenge_rule: ChallengeRule::NoPenalty,
        }
    }

    fn draw() -> GameEvent {
        GameEvent::Draw { difficulty: None }
    }

    fn place(participant_id: Uuid, insert_index: usize) -> GameEvent {
        GameEvent::Place {
            participant_id,
            insert_index,
        }
    }

    fn years(p: &Participant) -> Vec<i32> {
        p.timeline.iter().map(|c| c.year).collect()
    }

    #[test]
    fn end_to_end_individual_scenario() {
        let catalog = test_catalog();
        let state = game(GameMode::Individual, &["a", "b"], &["P"]);
        let p = state.participants[0].id;

        let state = apply(&state, &catalog, draw());
        assert_eq!(state.deck.current_song_id.as_deref(), Some("a"));

        let state = apply(&state, &catalog, place(p, 0));
        let player = state.participant(p).unwrap();
        assert_eq!(player.score, 1);
        assert_eq!(years(player), [2005]);
        assert!(state.deck.revealed);
        assert!(state.last_result.as_ref().unwrap().ok);

        let state = apply(&state, &catalog, draw());
        assert_eq!(state.deck.current_song_id.as_deref(), Some("b"));
        assert!(!state.deck.revealed);
        assert!(state.last_result.is_none());

        let state = apply(&state, &catalog, place(p, 0));
        let player = state.participant(p).unwrap();
        assert_eq!(player.score, 2);
        let ids: Vec<&str> = player.timeline.iter().map(|c| c.song_id.as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
        assert_eq!(judge(&player.timeline, 1, 2010), Ok(false));
    }

    #[test]
    fn failed_placement_discards_the_card_and_floors_the_score() {
        let catalog = test_catalog();
        let state = game(GameMode::Individual, &["a", "b"], &["P"]);
        let p = state.participants[0].id;

        let state = apply(&state, &catalog, draw());
        let state = apply(&state, &catalog, place(p, 0));
        let state = apply(&state, &catalog, draw());
        // b is 1999, after a (2005) is wrong
        let state = apply(&state, &catalog, place(p, 1));

        let player = state.participant(p).unwrap();
        assert_eq!(player.score, 0);
        assert_eq!(years(player), [2005]);
        let last = state.last_result.as_ref().unwrap();
        assert!(!last.ok);
        assert_eq!(last.actual_year, 1999);
        assert_eq!(last.inserted_index, 1);
        assert!(state.deck.used_song_ids.contains(&"b".to_string()));
    }

    #[test]
    fn filtered_draw_keeps_non_matching_songs_in_order() {
        let catalog = test_catalog();
        let state = game(GameMode::Individual, &["b", "a", "c", "d"], &["P"]);

        let state = apply(
            &state,
            &catalog,
            GameEvent::Draw {
                difficulty: Some(Difficulty::Easy),
            },
        );
        assert_eq!(state.deck.current_song_id.as_deref(), Some("a"));
        assert_eq!(state.deck.deck_song_ids, ["b", "c", "d"]);
        assert_eq!(state.deck.used_song_ids, ["a"]);

        let state = apply(
            &state,
            &catalog,
            GameEvent::Draw {
                difficulty: Some(Difficulty::Easy),
            },
        );
        assert_eq!(state.deck.current_song_id.as_deref(), Some("d"));
        assert_eq!(state.deck.deck_song_ids, ["b", "c"]);

        let err = try_apply(
            &state,
            &catalog,
            GameEvent::Draw {
                difficulty: Some(Difficulty::Easy),
            },
        )
        .unwrap_err();
        assert_eq!(
            err,
            Ignored::DeckExhausted {
                filter: Some(Difficulty::Easy)
            }
        );
    }

    #[test]
    fn deck_and_used_stay_disjoint_and_conserve_size() {
        let catalog = test_catalog();
        let mut rng = StdRng::seed_from_u64(3);
        let mut state = GameState::fresh_individual(&catalog, &mut rng);
        let total = catalog.len();

        for filter in [
            Some(Difficulty::Hard),
            None,
            Some(Difficulty::Easy),
            None,
            Some(Difficulty::Hard),
            None,
            None,
        ] {
            if let Ok(next) = try_apply(&state, &catalog, GameEvent::Draw { difficulty: filter }) {
                state = next;
            }
            let deck = &state.deck;
            assert!(deck.deck_song_ids.iter().all(|id| !deck.used_song_ids.contains(id)));
            assert_eq!(deck.deck_song_ids.len() + deck.used_song_ids.len(), total);
            if let Some(current) = &deck.current_song_id {
                assert!(deck.used_song_ids.contains(current));
            }
        }
        assert!(state.deck.deck_song_ids.is_empty());
    }

    #[test]
    fn reveal_requires_a_pending_unrevealed_song() {
        let catalog = test_catalog();
        let state = game(GameMode::Individual, &["a"], &["P"]);
        assert_eq!(
            try_apply(&state, &catalog, GameEvent::Reveal).unwrap_err(),
            Ignored::NoCurrentSong
        );

        let state = apply(&state, &catalog, draw());
        let state = apply(&state, &catalog, GameEvent::Reveal);
        assert!(state.deck.revealed);
        assert_eq!(
            try_apply(&state, &catalog, GameEvent::Reveal).unwrap_err(),
            Ignored::AlreadyRevealed
        );
    }

    #[test]
    fn reveal_does_not_block_placement() {
        let catalog = test_catalog();
        let state = game(GameMode::Individual, &["a"], &["P"]);
        let p = state.participants[0].id;

        let state = apply(&state, &catalog, draw());
        let state = apply(&state, &catalog, GameEvent::Reveal);
        assert!(can_place(&state, p));
        let state = apply(&state, &catalog, place(p, 0));
        assert_eq!(state.participant(p).unwrap().score, 1);
    }

    #[test]
    fn placement_guards_leave_state_untouched() {
        let catalog = test_catalog();
        let state = game(GameMode::Individual, &["a"], &["P"]);
        let p = state.participants[0].id;

        assert_eq!(
            try_apply(&state, &catalog, place(p, 0)).unwrap_err(),
            Ignored::NoCurrentSong
        );

        let state = apply(&state, &catalog, draw());
        let stranger = Uuid::new_v4();
        assert_eq!(
            try_apply(&state, &catalog, place(stranger, 0)).unwrap_err(),
            Ignored::UnknownParticipant(stranger)
        );
        assert_eq!(
            try_apply(&state, &catalog, place(p, 1)).unwrap_err(),
            Ignored::SlotOutOfRange(SlotOutOfRange { index: 1, len: 0 })
        );

        let placed = apply(&state, &catalog, place(p, 0));
        assert_eq!(
            try_apply(&placed, &catalog, place(p, 0)).unwrap_err(),
            Ignored::NotEligible(p)
        );
    }

    #[test]
    fn successful_placement_touches_only_the_acting_timeline() {
        let catalog = test_catalog();
        let state = game(GameMode::Individual, &["c"], &["P", "Q"]);
        let (p, q) = (state.participants[0].id, state.participants[1].id);

        let state = apply(&state, &catalog, draw());
        let state = apply(&state, &catalog, place(q, 0));

        assert_eq!(state.participant(q).unwrap().timeline.len(), 1);
        assert!(state.participant(p).unwrap().timeline.is_empty());
        assert_eq!(state.participant(p).unwrap().score, 0);
    }

    #[test]
    fn single_rule_only_lets_the_active_team_place_once() {
        let catalog = test_catalog();
        let state = game(GameMode::Teams, &["a", "b"], &["T1", "T2", "T3"]);
        let (t1, t2) = (state.participants[0].id, state.participants[1].id);

        let state = apply(&state, &catalog, draw());
        assert!(can_place(&state, t1));
        assert!(!can_place(&state, t2));
        assert_eq!(
            try_apply(&state, &catalog, place(t2, 0)).unwrap_err(),
            Ignored::NotEligible(t2)
        );

        let state = apply(&state, &catalog, GameEvent::SetActiveTeam(t2));
        assert!(can_place(&state, t2));
        let state = apply(&state, &catalog, place(t2, 0));
        assert!(state.round.round_placed_team_ids.is_empty());
        assert!(!can_place(&state, t2));
        assert!(!can_place(&state, t1));
        // no automatic rotation
        assert_eq!(state.round.active_team_id, Some(t2));
    }

    #[test]
    fn all_rule_gives_every_team_one_attempt_per_song() {
        let catalog = test_catalog();
        let state = game(GameMode::Teams, &["a", "b"], &["X", "Y"]);
        let (x, y) = (state.participants[0].id, state.participants[1].id);

        let state = apply(&state, &catalog, GameEvent::SetRoundRule(RoundRule::All));
        let state = apply(&state, &catalog, draw());
        let state = apply(&state, &catalog, place(x, 0));
        assert!(state.round.round_placed_team_ids.contains(&x));
        assert_eq!(
            try_apply(&state, &catalog, place(x, 0)).unwrap_err(),
            Ignored::NotEligible(x)
        );

        let state = apply(&state, &catalog, place(y, 0));
        assert!(!can_place(&state, x));
        assert!(!can_place(&state, y));

        let state = apply(&state, &catalog, draw());
        assert!(state.round.round_placed_team_ids.is_empty());
        assert!(can_place(&state, x));
        assert!(can_place(&state, y));
    }

    #[test]
    fn round_rule_change_pins_active_team_and_clears_attempts() {
        let catalog = test_catalog();
        let mut state = game(GameMode::Teams, &["a"], &["X", "Y"]);
        state.round.active_team_id = None;
        state.round.round_rule = RoundRule::All;
        let x = state.participants[0].id;
        state.round.round_placed_team_ids.insert(x);

        let state = apply(&state, &catalog, GameEvent::SetRoundRule(RoundRule::Single));
        assert_eq!(state.round.active_team_id, Some(x));
        assert!(state.round.round_placed_team_ids.is_empty());
    }

    #[test]
    fn successful_challenge_awards_the_card_to_the_challenger() {
        let catalog = test_catalog();
        let mut state = game(GameMode::Teams, &["a", "b"], &["X", "Y"]);
        let (x, y) = (state.participants[0].id, state.participants[1].id);
        state.participants[0].score = 2;
        state.participants[1].timeline = vec![
            TimelineCard {
                song_id: "c".into(),
                year: 2012,
            },
            TimelineCard {
                song_id: "e".into(),
                year: 1995,
            },
        ];

        let mut state = apply(&state, &catalog, draw());
        // a (2005) dropped after 2008 is a miss
        state.participants[0].timeline = vec![TimelineCard {
            song_id: "d".into(),
            year: 2008,
        }];
        let state = apply(&state, &catalog, place(x, 1));
        assert!(!state.last_result.as_ref().unwrap().ok);
        assert_eq!(state.participant(x).unwrap().score, 1);

        let state = apply(
            &state,
            &catalog,
            GameEvent::ResolveChallenge {
                applied: true,
                challenger_id: Some(y),
            },
        );

        let challenger = state.participant(y).unwrap();
        assert_eq!(challenger.score, 1);
        assert_eq!(years(challenger), [1995, 2005, 2012]);
        assert_eq!(state.participant(x).unwrap().score, 1);
        assert_eq!(years(state.participant(x).unwrap()), [2008]);

        let outcome = state.last_result.as_ref().unwrap().challenge.clone().unwrap();
        assert_eq!(outcome.challenger_id, Some(y));
        assert!(outcome.succeeded);
    }

    #[test]
    fn failed_challenge_applies_the_configured_penalty() {
        let catalog = test_catalog();
        let mut state = game(GameMode::Teams, &["a"], &["X", "Y"]);
        let (x, y) = (state.participants[0].id, state.participants[1].id);
        state.participants[1].score = 3;

        let state = apply(&state, &catalog, draw());
        let placed = apply(&state, &catalog, place(x, 0));
        assert!(placed.last_result.as_ref().unwrap().ok);

        let challenge = GameEvent::ResolveChallenge {
            applied: true,
            challenger_id: Some(y),
        };
        let no_penalty = apply(&placed, &catalog, challenge.clone());
        assert_eq!(no_penalty.participant(y).unwrap().score, 3);
        assert!(!no_penalty.last_result.as_ref().unwrap().challenge.as_ref().unwrap().succeeded);

        let strict = apply(
            &placed,
            &catalog,
            GameEvent::SetChallengeRule(ChallengeRule::FailMinusOne),
        );
        let strict = apply(&strict, &catalog, challenge);
        assert_eq!(strict.participant(y).unwrap().score, 2);
        assert!(strict.participant(y).unwrap().timeline.is_empty());
    }

    #[test]
    fn challenge_resolution_is_idempotent() {
        let catalog = test_catalog();
        let state = game(GameMode::Teams, &["a"], &["X", "Y"]);
        let x = state.participants[0].id;

        let state = apply(&state, &catalog, draw());
        let state = apply(&state, &catalog, place(x, 0));
        let declined = apply(
            &state,
            &catalog,
            GameEvent::ResolveChallenge {
                applied: false,
                challenger_id: None,
            },
        );
        let outcome = declined.last_result.as_ref().unwrap().challenge.clone().unwrap();
        assert_eq!(outcome.challenger_id, None);
        assert!(!outcome.succeeded);

        let again = try_apply(
            &declined,
            &catalog,
            GameEvent::ResolveChallenge {
                applied: true,
                challenger_id: None,
            },
        );
        assert_eq!(again.unwrap_err(), Ignored::ChallengeAlreadyResolved);
    }

    #[test]
    fn invalid_challenger_resolves_as_failed_without_mutation() {
        let catalog = test_catalog();
        let mut state = game(GameMode::Teams, &["a"], &["X", "Y"]);
        let x = state.participants[0].id;
        state.challenge_rule = ChallengeRule::FailMinusOne;
        state.participants[0].timeline = vec![TimelineCard {
            song_id: "d".into(),
            year: 2008,
        }];

        let state = apply(&state, &catalog, draw());
        let state = apply(&state, &catalog, place(x, 1));
        let before = state.participants.clone();

        let resolved = apply(
            &state,
            &catalog,
            GameEvent::ResolveChallenge {
                applied: true,
                challenger_id: Some(x),
            },
        );
        assert_eq!(resolved.participants, before);
        let outcome = resolved.last_result.as_ref().unwrap().challenge.clone().unwrap();
        assert_eq!(outcome.challenger_id, None);
        assert!(!outcome.succeeded);
    }

    #[test]
    fn default_challenger_is_the_first_other_team() {
        let catalog = test_catalog();
        let state = game(GameMode::Teams, &["a"], &["X", "Y", "Z"]);
        let (x, y) = (state.participants[0].id, state.participants[1].id);
        let mut state = apply(&state, &catalog, draw());
        state.participants[0].timeline = vec![TimelineCard {
            song_id: "d".into(),
            year: 2008,
        }];
        let state = apply(&state, &catalog, place(x, 1));
        assert_eq!(default_challenger(&state), Some(y));

        let state = apply(
            &state,
            &catalog,
            GameEvent::ResolveChallenge {
                applied: true,
                challenger_id: None,
            },
        );
        let outcome = state.last_result.as_ref().unwrap().challenge.clone().unwrap();
        assert_eq!(outcome.challenger_id, Some(y));
        assert_eq!(state.participant(y).unwrap().score, 1);
        assert_eq!(default_challenger(&state), None);
    }

    #[test]
    fn challenges_are_teams_only() {
        let catalog = test_catalog();
        let state = game(GameMode::Individual, &["a"], &["P", "Q"]);
        let p = state.participants[0].id;
        let state = apply(&state, &catalog, draw());
        let state = apply(&state, &catalog, place(p, 0));

        let err = try_apply(
            &state,
            &catalog,
            GameEvent::ResolveChallenge {
                applied: true,
                challenger_id: None,
            },
        )
        .unwrap_err();
        assert_eq!(err, Ignored::RequiresMode(GameMode::Teams));
    }

    #[test]
    fn players_can_only_be_added_in_individual_mode() {
        let catalog = test_catalog();
        let state = game(GameMode::Individual, &["a"], &[]);
        let state = apply(
            &state,
            &catalog,
            GameEvent::AddPlayer {
                name: "  Mina ".into(),
            },
        );
        assert_eq!(state.participants[0].name, "Mina");
        assert_eq!(
            try_apply(&state, &catalog, GameEvent::AddPlayer { name: "   ".into() }).unwrap_err(),
            Ignored::EmptyName
        );

        let teams = game(GameMode::Teams, &["a"], &["X"]);
        assert_eq!(
            try_apply(&teams, &catalog, GameEvent::AddPlayer { name: "Mina".into() }).unwrap_err(),
            Ignored::RequiresMode(GameMode::Individual)
        );
    }

    #[test]
    fn switching_mode_starts_a_fresh_game() {
        let catalog = test_catalog();
        let state = game(GameMode::Individual, &["a"], &["P"]);
        let state = apply(&state, &catalog, draw());

        let teams = apply(&state, &catalog, GameEvent::SwitchMode(GameMode::Teams));
        assert_eq!(teams.mode, GameMode::Teams);
        assert_eq!(teams.participants.len(), 3);
        assert_eq!(teams.deck.deck_song_ids.len(), catalog.len());
        assert!(teams.deck.used_song_ids.is_empty());
        assert!(teams.deck.current_song_id.is_none());
        assert_eq!(teams.round.active_team_id, Some(teams.participants[0].id));

        let reset = apply(&teams, &catalog, GameEvent::Reset);
        assert_eq!(reset.mode, GameMode::Teams);
        assert_ne!(reset.participants[0].id, teams.participants[0].id);
        assert!(GameEvent::Reset.is_destructive());
        assert!(!draw().is_destructive());
    }

    #[test]
    fn rename_keeps_score_and_timeline() {
        let catalog = test_catalog();
        let mut state = game(GameMode::Teams, &["a"], &["X"]);
        state.participants[0].score = 4;
        let x = state.participants[0].id;

        let state = apply(
            &state,
            &catalog,
            GameEvent::RenameParticipant {
                participant_id: x,
                name: "Night Owls".into(),
            },
        );
        assert_eq!(state.participants[0].name, "Night Owls");
        assert_eq!(state.participants[0].score, 4);
    }
}
