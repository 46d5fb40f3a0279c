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

//! Application event distribution and orchestration.
//!
//! This module defines the central event-handling logic for the
//! application, bridging user input (keyboard), background worker updates
//! (playlist fetch, playback engine), and the UI rendering pipeline.
//!
//! # Architecture
//!
//! The system follows a reactive event-loop pattern:
//!
//! 1. **Capture**: Events are received via the [`AppEvent`] enum through a
//!    single channel.
//! 2. **Process**: [`process_events`] routes each event to the transport
//!    controller or the view state.
//! 3. **Render**: After each event is processed, the UI is re-drawn using
//!    the `ratatui` terminal.
//!
//! Every handler runs to completion before the next event is taken, so no
//! handler ever observes another handler mid-update.

mod key_handlers;

use std::io::Stdout;

use anyhow::{Result, bail};
use crossterm::event::KeyEvent;
use ratatui::{Terminal, prelude::CrosstermBackend};

use crate::{App, model::Track, player::EngineEvent, render::draw};

#[derive(Debug)]
pub(crate) enum AppEvent {
    Key(KeyEvent),

    /// The playlist fetch worker delivered the track list.
    PlaylistLoaded(Vec<Track>),

    /// Lifecycle notification from the playback engine worker.
    Engine(EngineEvent),

    Tick,

    ExitApplication,

    /// A user-visible failure notification for the status line.
    Error(String),
    /// An unrecoverable background failure; tears the application down.
    FatalError(String),
}

/// Runs the main application loop, handling events and rendering the UI in
/// the terminal.
///
/// This function loops until a 'quit' event is received or the event
/// channel is closed.
pub(crate) fn process_events(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
) -> Result<()> {
    while let Ok(event) = app.event_rx.recv() {
        match event {
            AppEvent::Key(key) => key_handlers::process_key_event(app, key)?,

            AppEvent::PlaylistLoaded(tracks) => {
                app.transport.set_playlist(tracks);
                app.cursor = 0;
            }

            AppEvent::Engine(engine_event) => {
                if let Some(failure) = app.transport.handle_engine_event(engine_event)? {
                    app.status = Some(failure.to_string());
                }
            }

            AppEvent::Error(message) => app.status = Some(message),

            AppEvent::FatalError(message) => bail!(message),

            AppEvent::Tick => {}

            AppEvent::ExitApplication => break,
        }

        // Render after every event processed
        terminal.draw(|f| draw(f, app))?;
    }

    Ok(())
}
