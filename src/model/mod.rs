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

//! Domain models and core data structures.
//!
//! This module defines the central entities of the application: the track
//! descriptors supplied by the playlist server and the playlist that holds
//! them in playback order.

pub(crate) mod playlist;

/// A single playable entry from the playlist server.
///
/// Tracks are immutable and carry no stable identifier; a track's identity
/// is its position in the playlist.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub name: String,
    pub uri: String,
}
