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

//! Domain error kinds.
//!
//! These are the failures a user can actually be told about. Everything
//! else (channel breakage, terminal problems) travels as a plain
//! [`anyhow::Error`]. An invalid seek is deliberately not represented
//! here: seeking against an unknown duration is silently dropped, never
//! reported.

use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum PlayerError {
    /// The playlist source could not be fetched or decoded. Fatal to the
    /// playlist feature, reported once; the player keeps running with an
    /// empty list.
    #[error("Playlist unavailable: {0}")]
    PlaylistUnavailable(String),

    /// The engine could not open a track. The transport reverts to paused
    /// and the playlist remains usable.
    #[error("Unable to play track: {0}")]
    TrackLoadFailed(String),

    /// A selection index outside the playlist. The UI path can never
    /// produce this; it indicates a programming error and is not treated
    /// as recoverable.
    #[error("Track selection out of range: {0}")]
    InvalidSelection(usize),
}
