//! Placement correctness against a year-ordered timeline.

use thiserror::Error;

use crate::state::game::TimelineCard;

/// The requested slot does not exist on the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("slot {index} is outside the timeline (valid slots are 0..={len})")]
pub struct SlotOutOfRange {
    /// Requested slot.
    pub index: usize,
    /// Number of cards on the timeline.
    pub len: usize,
}

/// Stable ascending sort by year; cards sharing a year keep their relative order.
pub fn sorted_by_year(timeline: &[TimelineCard]) -> Vec<TimelineCard> {
    let mut sorted = timeline.to_vec();
    sorted.sort_by_key(|card| card.year);
    sorted
}

/// Decide whether dropping a card of `actual_year` at `insert_index` of the
/// sorted timeline keeps it chronological. Equal neighbouring years are accepted.
pub fn judge(
    timeline: &[TimelineCard],
    insert_index: usize,
    actual_year: i32,
) -> Result<bool, SlotOutOfRange> {
    let sorted = sorted_by_year(timeline);
    if insert_index > sorted.len() {
        return Err(SlotOutOfRange {
            index: insert_index,
            len: sorted.len(),
        });
    }

    let left = insert_index
        .checked_sub(1)
        .and_then(|i| sorted.get(i))
        .map(|card| card.year);
    let right = sorted.get(insert_index).map(|card| card.year);

    let after_left = left.is_none_or(|year| actual_year >= year);
    let before_right = right.is_none_or(|year| actual_year <= year);
    Ok(after_left && before_right)
}

/// First slot of the sorted timeline whose year exceeds `year`.
pub fn insertion_index_for_year(timeline: &[TimelineCard], year: i32) -> usize {
    sorted_by_year(timeline)
        .iter()
        .take_while(|card| card.year <= year)
        .count()
}
