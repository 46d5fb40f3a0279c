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

//! Render the playlist interface.
//!
//! This module renders the track list with the active-track highlight (at
//! most one track carries it) and the navigation cursor.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState},
};

use crate::{App, render::icons::ICON_PLAY};

/// Renders the playlist widget. The active track is marked and styled with
/// the accent colour; the cursor row uses the highlight style.
pub(crate) fn draw_playlist(f: &mut Frame, area: Rect, app: &App) {
    let active_index = app.transport.playlist().active_index();

    let items: Vec<ListItem> = app
        .transport
        .playlist()
        .tracks()
        .iter()
        .enumerate()
        .map(|(index, track)| {
            if active_index == Some(index) {
                ListItem::new(format!("{} {}", ICON_PLAY, track.name)).style(
                    Style::default()
                        .fg(app.theme.accent_colour)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                ListItem::new(format!("  {}", track.name))
            }
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title(" Playlist ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border_colour)),
        )
        .highlight_style(Style::default().bg(app.theme.cursor_bg))
        .highlight_symbol(">> ");

    let mut state = ListState::default();
    if !app.transport.playlist().is_empty() {
        state.select(Some(app.cursor));
    }

    f.render_stateful_widget(list, area, &mut state);
}
