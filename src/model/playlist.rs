// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Playlist state.
//!
//! An ordered sequence of tracks, fixed once loaded, plus a single active
//! index. At most one track is active at a time; the active index is only
//! ever moved by the transport controller.

use crate::{error::PlayerError, model::Track};

pub(crate) struct Playlist {
    tracks: Vec<Track>,
    active_index: Option<usize>,
}

impl Playlist {
    pub(crate) fn new() -> Self {
        Self {
            tracks: Vec::new(),
            active_index: None,
        }
    }

    /// Builds a playlist from the fetched track list, pre-marking the
    /// first track as the active (default) selection.
    pub(crate) fn from_tracks(tracks: Vec<Track>) -> Self {
        let active_index = if tracks.is_empty() { None } else { Some(0) };
        Self {
            tracks,
            active_index,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.tracks.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub(crate) fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub(crate) fn active_index(&self) -> Option<usize> {
        self.active_index
    }

    pub(crate) fn active_track(&self) -> Option<&Track> {
        self.active_index.map(|index| &self.tracks[index])
    }

    /// Moves the active index, failing on an out-of-range selection.
    pub(crate) fn activate(&mut self, index: usize) -> Result<(), PlayerError> {
        if index < self.tracks.len() {
            self.active_index = Some(index);
            Ok(())
        } else {
            Err(PlayerError::InvalidSelection(index))
        }
    }

    /// The index after the active track, or `None` at the end of the list.
    /// There is no wraparound.
    pub(crate) fn next_index(&self) -> Option<usize> {
        self.active_index
            .and_then(|index| (index + 1 < self.tracks.len()).then_some(index + 1))
    }

    /// The index before the active track, or `None` at the start of the
    /// list.
    pub(crate) fn previous_index(&self) -> Option<usize> {
        self.active_index.and_then(|index| index.checked_sub(1))
    }
}
