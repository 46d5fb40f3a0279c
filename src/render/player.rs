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

//! Render the music player interface.
//!
//! This module renders the visual representation of the current track,
//! playback state, repeat mode, and the progress and volume indicators.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Padding, Paragraph},
};

use crate::{
    App,
    render::icons::{ICON_PAUSE, ICON_PLAY, ICON_REPEAT_LIST, ICON_REPEAT_ONE, ICON_STOP, ICON_VOLUME},
    util,
};

/// Renders the main player widget including track info and indicators.
pub(crate) fn draw_player(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::TOP | Borders::BOTTOM)
        .border_style(Style::default().fg(app.theme.border_colour))
        .padding(Padding::horizontal(1));

    let inner_area = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner_area);

    draw_now_playing(f, chunks[0], app);
    draw_progress(f, chunks[2], app);
    draw_volume(f, chunks[3], app);
}

fn draw_now_playing(f: &mut Frame, area: Rect, app: &App) {
    let transport = &app.transport;

    let state_icon = if transport.is_playing() {
        ICON_PLAY
    } else if transport.has_engine_source() {
        ICON_PAUSE
    } else {
        ICON_STOP
    };

    let repeat_icon = if transport.loop_enabled() {
        ICON_REPEAT_ONE
    } else {
        ICON_REPEAT_LIST
    };

    let name = transport.now_playing().unwrap_or("-");

    let info_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(24)])
        .split(area);

    let track_line = Line::from(vec![
        Span::styled(
            format!(" {} ", state_icon),
            Style::default().add_modifier(Modifier::BOLD),
        )
        .fg(Color::White),
        Span::styled(name, Style::default().add_modifier(Modifier::BOLD))
            .fg(app.theme.accent_colour),
        Span::raw("  "),
        Span::raw(repeat_icon).fg(app.theme.border_colour),
    ]);
    f.render_widget(Paragraph::new(track_line), info_chunks[0]);

    let elapsed = transport.elapsed_seconds().max(0.0) as u64;
    let duration = transport
        .duration()
        .map(|duration| duration.seconds() as u64)
        .unwrap_or(0);

    let time_line = Line::from(vec![
        Span::styled(
            util::format::format_time(elapsed),
            Style::default().add_modifier(Modifier::BOLD),
        )
        .fg(app.theme.accent_colour),
        Span::styled(" / ", Style::default().add_modifier(Modifier::BOLD)).fg(Color::White),
        Span::styled(
            util::format::format_time(duration),
            Style::default().add_modifier(Modifier::BOLD),
        )
        .fg(app.theme.accent_colour),
    ]);
    f.render_widget(
        Paragraph::new(time_line).alignment(Alignment::Right),
        info_chunks[1],
    );
}

fn draw_progress(f: &mut Frame, area: Rect, app: &App) {
    let ratio = f64::from(app.transport.progress()) / 100.0;

    let gauge = Gauge::default()
        .gauge_style(
            Style::default()
                .fg(app.theme.accent_colour)
                .bg(app.theme.gauge_track_colour),
        )
        .ratio(ratio)
        .label("")
        .use_unicode(true);
    f.render_widget(gauge, area);
}

fn draw_volume(f: &mut Frame, area: Rect, app: &App) {
    let volume = app.transport.volume();

    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(24),
            Constraint::Length(6),
            Constraint::Min(0),
        ])
        .split(area);

    f.render_widget(Paragraph::new(ICON_VOLUME), layout[0]);

    let gauge = Gauge::default()
        .gauge_style(
            Style::default()
                .fg(app.theme.accent_colour)
                .bg(app.theme.gauge_track_colour),
        )
        .ratio(f64::from(volume) / 100.0)
        .label("")
        .use_unicode(true);
    f.render_widget(gauge, layout[1]);

    let label = Paragraph::new(format!(" {}%", volume))
        .alignment(Alignment::Left)
        .fg(Color::White);
    f.render_widget(label, layout[2]);
}
