use indexmap::IndexMap;

use crate::state::game::{Difficulty, Song, SongId};

/// Read-only song catalog keyed by song id, in source order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    songs: IndexMap<SongId, Song>,
}

impl Catalog {
    /// Build a catalog from already validated songs.
    pub(crate) fn from_songs(songs: impl IntoIterator<Item = Song>) -> Self {
        Self {
            songs: songs.into_iter().map(|s| (s.id.clone(), s)).collect(),
        }
    }

    /// Look up a song.
    pub fn get(&self, id: &str) -> Option<&Song> {
        self.songs.get(id)
    }

    /// Whether `id` is a known song.
    pub fn contains(&self, id: &str) -> bool {
        self.songs.contains_key(id)
    }

    /// Song ids in catalog order.
    pub fn ids(&self) -> impl Iterator<Item = &SongId> {
        self.songs.keys()
    }

    /// Songs in catalog order.
    pub fn songs(&self) -> impl Iterator<Item = &Song> {
        self.songs.values()
    }

    /// Number of songs.
    pub fn len(&self) -> usize {
        self.songs.len()
    }

    /// Whether the catalog holds no song.
    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    /// Whether `id` is a known song satisfying the optional difficulty filter.
    pub fn matches(&self, id: &str, filter: Option<Difficulty>) -> bool {
        match (self.songs.get(id), filter) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(song), Some(difficulty)) => song.difficulty == difficulty,
        }
    }
}

#[cfg(test)]
pub(crate) fn test_song(id: &str, year: i32, difficulty: Difficulty) -> Song {
    Song {
        id: id.into(),
        title: format!("Title {id}"),
        artist: format!("Artist {id}"),
        year,
        difficulty,
        search_hint: format!("Artist {id} Title {id}"),
        video_id: None,
    }
}

#[cfg(test)]
pub(crate) fn test_catalog() -> Catalog {
    Catalog::from_songs([
        test_song("a", 2005, Difficulty::Easy),
        test_song("b", 1999, Difficulty::Hard),
        test_song("c", 2012, Difficulty::Normal),
        test_song("d", 2008, Difficulty::Easy),
        test_song("e", 2020, Difficulty::Hard),
    ])
}
