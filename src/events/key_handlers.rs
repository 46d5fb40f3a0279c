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

//! Keyboard input routing.
//!
//! Translates low-level key events into playlist navigation and transport
//! intents. The arrow keys stand in for the original's indicator drags:
//! left/right move the progress indicator, `-`/`=` move the volume
//! indicator.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use crate::{App, events::AppEvent, transport::TransportIntent};

const SEEK_STEP: i8 = 5;
const VOLUME_STEP: i8 = 5;

/// Maps keyboard input to application actions and transport intents.
///
/// # Errors
///
/// Returns an error if an intent cannot be delivered to the engine worker
/// or the event channel has been dropped.
pub(super) fn process_key_event(app: &mut App, key: KeyEvent) -> Result<()> {
    match key.code {
        KeyCode::Char('q') => {
            app.event_tx.send(AppEvent::ExitApplication)?;
        }

        // Playlist cursor
        KeyCode::Char('j') | KeyCode::Down => {
            let last = app.transport.playlist().len().saturating_sub(1);
            app.cursor = (app.cursor + 1).min(last);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.cursor = app.cursor.saturating_sub(1);
        }

        // Playback controls
        KeyCode::Enter => {
            if app.cursor < app.transport.playlist().len() {
                app.transport
                    .handle_intent(TransportIntent::SelectTrack(app.cursor))?;
            }
        }
        KeyCode::Char(' ') => app.transport.handle_intent(TransportIntent::TogglePlayPause)?,
        KeyCode::Char('n') | KeyCode::Char('>') => {
            app.transport.handle_intent(TransportIntent::Next)?;
        }
        KeyCode::Char('p') | KeyCode::Char('<') => {
            app.transport.handle_intent(TransportIntent::Previous)?;
        }
        KeyCode::Char('r') => app.transport.handle_intent(TransportIntent::ToggleRepeat)?,

        // Indicators
        KeyCode::Left => {
            app.transport
                .handle_intent(TransportIntent::NudgeSeek(-SEEK_STEP))?;
        }
        KeyCode::Right => {
            app.transport
                .handle_intent(TransportIntent::NudgeSeek(SEEK_STEP))?;
        }
        KeyCode::Char('-') => {
            app.transport
                .handle_intent(TransportIntent::NudgeVolume(-VOLUME_STEP))?;
        }
        KeyCode::Char('=') | KeyCode::Char('+') => {
            app.transport
                .handle_intent(TransportIntent::NudgeVolume(VOLUME_STEP))?;
        }

        _ => {}
    }

    Ok(())
}
