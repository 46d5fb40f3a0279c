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

//! Transport state machine.
//!
//! The [`TransportController`] decides, for every user intent and engine
//! event, what the current track is, whether playback is active, and which
//! commands the engine must receive. It is the sole writer of the playlist's
//! active index and of the transport flags, so every transition here is the
//! whole story of how playback state changes.
//!
//! The controller sits between two event sources that it never blocks on:
//! user intents arrive from the key handlers, engine events arrive from the
//! playback worker. Each handler runs to completion before the next event
//! is processed, so transitions are atomic with respect to each other.
//! Events from a superseded load are recognised by their generation tag and
//! discarded.

use anyhow::Result;

use crate::{
    error::PlayerError,
    model::{Track, playlist::Playlist},
    player::{EngineEvent, KnownDuration, PlaybackEngine},
    util::indicator,
};

/// A user action on the transport, already stripped of any UI detail.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum TransportIntent {
    SelectTrack(usize),
    TogglePlayPause,
    Next,
    Previous,
    ToggleRepeat,
    /// Move the progress indicator by a signed step and seek there.
    NudgeSeek(i8),
    /// Move the volume indicator by a signed step.
    NudgeVolume(i8),
}

pub(crate) struct TransportController {
    playlist: Playlist,
    engine: PlaybackEngine,

    is_playing: bool,
    loop_enabled: bool,
    /// True once a URI has been loaded at least once; distinguishes "no
    /// track ever chosen" from "paused".
    has_engine_source: bool,

    /// Generation of the load the controller currently cares about.
    current_generation: Option<u64>,

    duration: Option<KnownDuration>,
    elapsed_seconds: f64,
    /// Progress indicator value, 0..=100.
    progress: u8,
    /// Volume indicator value, 0..=100.
    volume: u8,

    now_playing: Option<String>,
}

impl TransportController {
    pub(crate) fn new(engine: PlaybackEngine) -> Self {
        Self {
            playlist: Playlist::new(),
            engine,
            is_playing: false,
            loop_enabled: false,
            has_engine_source: false,
            current_generation: None,
            duration: None,
            elapsed_seconds: 0.0,
            progress: 0,
            volume: 100,
            now_playing: None,
        }
    }

    /// Installs the fetched playlist. The first track becomes the
    /// pre-marked default selection; nothing is loaded into the engine
    /// until the user asks for playback.
    pub(crate) fn set_playlist(&mut self, tracks: Vec<Track>) {
        self.playlist = Playlist::from_tracks(tracks);
    }

    pub(crate) fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub(crate) fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub(crate) fn loop_enabled(&self) -> bool {
        self.loop_enabled
    }

    pub(crate) fn has_engine_source(&self) -> bool {
        self.has_engine_source
    }

    pub(crate) fn progress(&self) -> u8 {
        self.progress
    }

    pub(crate) fn volume(&self) -> u8 {
        self.volume
    }

    pub(crate) fn elapsed_seconds(&self) -> f64 {
        self.elapsed_seconds
    }

    pub(crate) fn duration(&self) -> Option<KnownDuration> {
        self.duration
    }

    pub(crate) fn now_playing(&self) -> Option<&str> {
        self.now_playing.as_deref()
    }

    /// Applies a user intent, issuing whatever engine commands the
    /// transition requires.
    pub(crate) fn handle_intent(&mut self, intent: TransportIntent) -> Result<()> {
        match intent {
            TransportIntent::SelectTrack(index) => self.select_track(index),

            TransportIntent::TogglePlayPause => self.toggle_play_pause(),

            TransportIntent::Next => match self.playlist.next_index() {
                Some(index) => self.select_track(index),
                // At the last track: no-op, playback state unchanged
                None => Ok(()),
            },

            TransportIntent::Previous => match self.playlist.previous_index() {
                Some(index) => self.select_track(index),
                None => Ok(()),
            },

            TransportIntent::ToggleRepeat => {
                self.loop_enabled = !self.loop_enabled;
                self.engine.set_loop(self.loop_enabled)
            }

            TransportIntent::NudgeSeek(delta) => {
                // Seeking is only meaningful once the duration is known;
                // until then the intent is silently dropped
                if self.duration.is_some() {
                    let value = indicator::nudge(self.progress, delta);
                    self.progress = value;
                    self.engine.seek_fraction(indicator::to_fraction(value))?;
                }
                Ok(())
            }

            TransportIntent::NudgeVolume(delta) => {
                let value = indicator::nudge(self.volume, delta);
                self.volume = value;
                self.engine.set_volume_fraction(indicator::to_fraction(value))
            }
        }
    }

    /// Reacts to an engine event. Returns a user-visible failure when the
    /// event warrants a notification; all other outcomes are silent state
    /// updates.
    pub(crate) fn handle_engine_event(
        &mut self,
        event: EngineEvent,
    ) -> Result<Option<PlayerError>> {
        match event {
            // Volume belongs to the engine, not to a source, so it is
            // never stale
            EngineEvent::VolumeChanged { volume } => {
                self.volume = indicator::to_indicator(volume);
            }

            EngineEvent::Started { generation } => {
                if self.is_current(generation) {
                    self.now_playing = self.playlist.active_track().map(|t| t.name.clone());
                }
            }

            EngineEvent::TimeUpdated {
                generation,
                elapsed_seconds,
                duration,
            } => {
                if self.is_current(generation) {
                    self.duration = duration;
                    self.elapsed_seconds = elapsed_seconds;
                    self.progress = indicator::position(elapsed_seconds, duration);
                }
            }

            EngineEvent::Ended { generation } => {
                if self.is_current(generation) {
                    self.auto_advance()?;
                }
            }

            EngineEvent::Failed { generation, reason } => {
                if self.is_current(generation) {
                    // The engine is assumed stopped; the selection stays
                    // where it was and no retry is attempted
                    self.is_playing = false;
                    return Ok(Some(PlayerError::TrackLoadFailed(reason)));
                }
            }
        }

        Ok(None)
    }

    fn is_current(&self, generation: u64) -> bool {
        self.current_generation == Some(generation)
    }

    /// Activates a track and restarts it from position 0, even when it is
    /// the already-active track. Re-selection is never a resume.
    fn select_track(&mut self, index: usize) -> Result<()> {
        self.playlist.activate(index)?;
        // activate guarantees the index is in range
        let uri = self.playlist.tracks()[index].uri.clone();

        if self.has_engine_source {
            self.engine.pause()?;
        }

        let generation = self.engine.load(&uri)?;
        self.current_generation = Some(generation);
        self.has_engine_source = true;
        self.duration = None;
        self.elapsed_seconds = 0.0;
        self.progress = 0;

        self.engine.play()?;
        self.is_playing = true;
        Ok(())
    }

    fn toggle_play_pause(&mut self) -> Result<()> {
        if !self.has_engine_source {
            // Idle: start from the pre-marked default selection
            if self.playlist.is_empty() {
                return Ok(());
            }
            let index = self.playlist.active_index().unwrap_or(0);
            return self.select_track(index);
        }

        if self.is_playing {
            self.engine.pause()?;
            self.is_playing = false;
        } else {
            // Resume keeps the engine's current position
            self.engine.play()?;
            self.is_playing = true;
        }
        Ok(())
    }

    /// End-of-track policy when the engine reports a natural end.
    fn auto_advance(&mut self) -> Result<()> {
        // Native looping restarts the source inside the engine; a stray
        // end event must not advance the list
        if self.loop_enabled {
            return Ok(());
        }

        match self.playlist.next_index() {
            Some(index) => self.select_track(index),
            None => {
                // End of list: stay on the last track, paused and rewound.
                // The duration is known at this point, so the rewind is
                // not dropped by the unknown-duration guard.
                self.engine.pause()?;
                self.engine.seek_fraction(0.0)?;
                self.elapsed_seconds = 0.0;
                self.progress = 0;
                self.is_playing = false;
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc::{self, Receiver};

    use super::*;
    use crate::player::EngineCommand;

    fn track(name: &str) -> Track {
        Track {
            name: name.to_string(),
            uri: format!("http://music.local/{}.mp3", name),
        }
    }

    fn controller_with(names: &[&str]) -> (TransportController, Receiver<EngineCommand>) {
        let (command_tx, command_rx) = mpsc::channel();
        let engine = PlaybackEngine::from_sender(command_tx);
        let mut controller = TransportController::new(engine);
        controller.set_playlist(names.iter().map(|name| track(name)).collect());
        (controller, command_rx)
    }

    fn drain(command_rx: &Receiver<EngineCommand>) -> Vec<EngineCommand> {
        command_rx.try_iter().collect()
    }

    fn time_update(generation: u64, elapsed: f64, duration_seconds: f64) -> EngineEvent {
        EngineEvent::TimeUpdated {
            generation,
            elapsed_seconds: elapsed,
            duration: KnownDuration::new(duration_seconds),
        }
    }

    #[test]
    fn select_then_next_advances_and_plays() {
        let (mut controller, command_rx) = controller_with(&["a", "b", "c"]);

        controller
            .handle_intent(TransportIntent::SelectTrack(0))
            .unwrap();
        assert_eq!(
            drain(&command_rx),
            vec![
                EngineCommand::Load {
                    uri: "http://music.local/a.mp3".to_string(),
                    generation: 1,
                },
                EngineCommand::Play,
            ]
        );

        controller.handle_intent(TransportIntent::Next).unwrap();
        assert_eq!(controller.playlist().active_index(), Some(1));
        assert!(controller.is_playing());
        assert_eq!(
            drain(&command_rx),
            vec![
                EngineCommand::Pause,
                EngineCommand::Load {
                    uri: "http://music.local/b.mp3".to_string(),
                    generation: 2,
                },
                EngineCommand::Play,
            ]
        );
    }

    #[test]
    fn next_at_last_index_is_a_noop() {
        let (mut controller, command_rx) = controller_with(&["a", "b"]);
        controller
            .handle_intent(TransportIntent::SelectTrack(1))
            .unwrap();
        drain(&command_rx);

        controller.handle_intent(TransportIntent::Next).unwrap();
        assert_eq!(controller.playlist().active_index(), Some(1));
        assert!(controller.is_playing());
        assert!(drain(&command_rx).is_empty());
    }

    #[test]
    fn previous_at_first_index_is_a_noop() {
        let (mut controller, command_rx) = controller_with(&["a", "b"]);
        controller
            .handle_intent(TransportIntent::SelectTrack(0))
            .unwrap();
        drain(&command_rx);

        controller.handle_intent(TransportIntent::Previous).unwrap();
        assert_eq!(controller.playlist().active_index(), Some(0));
        assert!(controller.is_playing());
        assert!(drain(&command_rx).is_empty());
    }

    #[test]
    fn previous_restarts_the_adjacent_track_from_zero() {
        let (mut controller, command_rx) = controller_with(&["a", "b"]);
        controller
            .handle_intent(TransportIntent::SelectTrack(1))
            .unwrap();
        controller
            .handle_engine_event(time_update(1, 30.0, 120.0))
            .unwrap();
        assert_eq!(controller.progress(), 25);
        drain(&command_rx);

        controller.handle_intent(TransportIntent::Previous).unwrap();
        assert_eq!(controller.playlist().active_index(), Some(0));
        assert!(controller.is_playing());
        assert_eq!(controller.progress(), 0);
        assert_eq!(controller.elapsed_seconds(), 0.0);
        assert_eq!(
            drain(&command_rx),
            vec![
                EngineCommand::Pause,
                EngineCommand::Load {
                    uri: "http://music.local/a.mp3".to_string(),
                    generation: 2,
                },
                EngineCommand::Play,
            ]
        );
    }

    #[test]
    fn reselecting_the_active_track_restarts_it() {
        let (mut controller, command_rx) = controller_with(&["a"]);
        controller
            .handle_intent(TransportIntent::SelectTrack(0))
            .unwrap();
        controller
            .handle_engine_event(time_update(1, 60.0, 120.0))
            .unwrap();
        drain(&command_rx);

        controller
            .handle_intent(TransportIntent::SelectTrack(0))
            .unwrap();
        assert_eq!(controller.progress(), 0);
        let commands = drain(&command_rx);
        assert!(commands.contains(&EngineCommand::Load {
            uri: "http://music.local/a.mp3".to_string(),
            generation: 2,
        }));
    }

    #[test]
    fn toggle_repeat_round_trips_and_reaches_engine() {
        let (mut controller, command_rx) = controller_with(&["a"]);
        assert!(!controller.loop_enabled());

        controller
            .handle_intent(TransportIntent::ToggleRepeat)
            .unwrap();
        assert!(controller.loop_enabled());

        controller
            .handle_intent(TransportIntent::ToggleRepeat)
            .unwrap();
        assert!(!controller.loop_enabled());

        assert_eq!(
            drain(&command_rx),
            vec![EngineCommand::SetLoop(true), EngineCommand::SetLoop(false)]
        );
    }

    #[test]
    fn ended_with_loop_enabled_never_advances() {
        let (mut controller, command_rx) = controller_with(&["a", "b"]);
        controller
            .handle_intent(TransportIntent::SelectTrack(0))
            .unwrap();
        controller
            .handle_intent(TransportIntent::ToggleRepeat)
            .unwrap();
        drain(&command_rx);

        controller
            .handle_engine_event(EngineEvent::Ended { generation: 1 })
            .unwrap();
        assert_eq!(controller.playlist().active_index(), Some(0));
        assert!(controller.is_playing());
        assert!(drain(&command_rx).is_empty());
    }

    #[test]
    fn auto_advance_walks_the_playlist_then_stops_at_the_end() {
        let (mut controller, command_rx) = controller_with(&["a", "b", "c"]);
        controller
            .handle_intent(TransportIntent::SelectTrack(0))
            .unwrap();

        controller
            .handle_engine_event(EngineEvent::Ended { generation: 1 })
            .unwrap();
        assert_eq!(controller.playlist().active_index(), Some(1));
        assert!(controller.is_playing());

        controller
            .handle_engine_event(EngineEvent::Ended { generation: 2 })
            .unwrap();
        assert_eq!(controller.playlist().active_index(), Some(2));
        assert!(controller.is_playing());
        drain(&command_rx);

        controller
            .handle_engine_event(EngineEvent::Ended { generation: 3 })
            .unwrap();
        assert_eq!(controller.playlist().active_index(), Some(2));
        assert!(!controller.is_playing());
        assert_eq!(controller.progress(), 0);
        assert_eq!(
            drain(&command_rx),
            vec![EngineCommand::Pause, EngineCommand::SeekFraction(0.0)]
        );

        // Resuming after completion replays the rewound last track; the
        // engine keeps the source held open at its end for exactly this
        controller
            .handle_intent(TransportIntent::TogglePlayPause)
            .unwrap();
        assert!(controller.is_playing());
        assert_eq!(drain(&command_rx), vec![EngineCommand::Play]);
    }

    #[test]
    fn toggle_from_idle_selects_default_then_pauses_then_resumes() {
        let (mut controller, command_rx) = controller_with(&["a", "b"]);

        // First press: load and play the pre-marked default (first track)
        controller
            .handle_intent(TransportIntent::TogglePlayPause)
            .unwrap();
        assert_eq!(controller.playlist().active_index(), Some(0));
        assert!(controller.is_playing());
        assert!(controller.has_engine_source());
        assert_eq!(
            drain(&command_rx),
            vec![
                EngineCommand::Load {
                    uri: "http://music.local/a.mp3".to_string(),
                    generation: 1,
                },
                EngineCommand::Play,
            ]
        );

        // Second press: pause, keeping the position
        controller
            .handle_intent(TransportIntent::TogglePlayPause)
            .unwrap();
        assert!(!controller.is_playing());
        assert_eq!(drain(&command_rx), vec![EngineCommand::Pause]);

        // Third press: resume without reloading, so playback continues
        // from the current position instead of restarting at 0
        controller
            .handle_intent(TransportIntent::TogglePlayPause)
            .unwrap();
        assert!(controller.is_playing());
        assert_eq!(drain(&command_rx), vec![EngineCommand::Play]);
    }

    #[test]
    fn toggle_on_empty_playlist_is_a_noop() {
        let (mut controller, command_rx) = controller_with(&[]);
        controller
            .handle_intent(TransportIntent::TogglePlayPause)
            .unwrap();
        assert!(!controller.is_playing());
        assert!(!controller.has_engine_source());
        assert!(drain(&command_rx).is_empty());
    }

    #[test]
    fn seek_nudge_without_known_duration_is_dropped() {
        let (mut controller, command_rx) = controller_with(&["a"]);
        controller
            .handle_intent(TransportIntent::SelectTrack(0))
            .unwrap();
        drain(&command_rx);

        // No time update has arrived yet, so the duration is unknown
        controller
            .handle_intent(TransportIntent::NudgeSeek(5))
            .unwrap();
        assert_eq!(controller.progress(), 0);
        assert!(drain(&command_rx).is_empty());
    }

    #[test]
    fn seek_nudge_with_known_duration_moves_indicator_and_seeks() {
        let (mut controller, command_rx) = controller_with(&["a"]);
        controller
            .handle_intent(TransportIntent::SelectTrack(0))
            .unwrap();
        controller
            .handle_engine_event(time_update(1, 60.0, 120.0))
            .unwrap();
        assert_eq!(controller.progress(), 50);
        drain(&command_rx);

        controller
            .handle_intent(TransportIntent::NudgeSeek(5))
            .unwrap();
        assert_eq!(controller.progress(), 55);
        assert!(controller.is_playing());
        assert_eq!(drain(&command_rx), vec![EngineCommand::SeekFraction(0.55)]);
    }

    #[test]
    fn time_update_with_unknown_duration_renders_neutral_progress() {
        let (mut controller, _command_rx) = controller_with(&["a"]);
        controller
            .handle_intent(TransportIntent::SelectTrack(0))
            .unwrap();

        controller
            .handle_engine_event(EngineEvent::TimeUpdated {
                generation: 1,
                elapsed_seconds: 12.0,
                duration: None,
            })
            .unwrap();
        assert_eq!(controller.progress(), 0);
        assert!(controller.duration().is_none());
    }

    #[test]
    fn volume_nudge_updates_indicator_and_engine() {
        let (mut controller, command_rx) = controller_with(&["a"]);
        assert_eq!(controller.volume(), 100);

        controller
            .handle_intent(TransportIntent::NudgeVolume(-5))
            .unwrap();
        assert_eq!(controller.volume(), 95);
        assert_eq!(
            drain(&command_rx),
            vec![EngineCommand::SetVolumeFraction(0.95)]
        );
    }

    #[test]
    fn volume_changed_event_syncs_the_indicator() {
        let (mut controller, _command_rx) = controller_with(&["a"]);
        controller
            .handle_engine_event(EngineEvent::VolumeChanged { volume: 0.4 })
            .unwrap();
        assert_eq!(controller.volume(), 40);
    }

    #[test]
    fn started_event_refreshes_now_playing() {
        let (mut controller, _command_rx) = controller_with(&["a", "b"]);
        controller
            .handle_intent(TransportIntent::SelectTrack(1))
            .unwrap();
        assert!(controller.now_playing().is_none());

        controller
            .handle_engine_event(EngineEvent::Started { generation: 1 })
            .unwrap();
        assert_eq!(controller.now_playing(), Some("b"));
    }

    #[test]
    fn failure_reports_once_and_leaves_the_playlist_usable() {
        let (mut controller, command_rx) = controller_with(&["a", "b"]);
        controller
            .handle_intent(TransportIntent::SelectTrack(0))
            .unwrap();
        drain(&command_rx);

        let notice = controller
            .handle_engine_event(EngineEvent::Failed {
                generation: 1,
                reason: "bad format".to_string(),
            })
            .unwrap();
        assert!(matches!(notice, Some(PlayerError::TrackLoadFailed(_))));
        assert!(!controller.is_playing());
        assert_eq!(controller.playlist().active_index(), Some(0));

        // Navigation still functions normally afterwards
        controller.handle_intent(TransportIntent::Next).unwrap();
        assert_eq!(controller.playlist().active_index(), Some(1));
        assert!(controller.is_playing());
    }

    #[test]
    fn stale_generation_events_are_discarded() {
        let (mut controller, command_rx) = controller_with(&["a", "b"]);
        controller
            .handle_intent(TransportIntent::SelectTrack(0))
            .unwrap();
        controller
            .handle_intent(TransportIntent::SelectTrack(1))
            .unwrap();
        drain(&command_rx);

        // Late events from the superseded first load must not corrupt the
        // fresh state
        controller
            .handle_engine_event(EngineEvent::Ended { generation: 1 })
            .unwrap();
        assert_eq!(controller.playlist().active_index(), Some(1));
        assert!(controller.is_playing());
        assert!(drain(&command_rx).is_empty());

        let notice = controller
            .handle_engine_event(EngineEvent::Failed {
                generation: 1,
                reason: "late".to_string(),
            })
            .unwrap();
        assert!(notice.is_none());
        assert!(controller.is_playing());

        controller
            .handle_engine_event(time_update(1, 10.0, 100.0))
            .unwrap();
        assert_eq!(controller.progress(), 0);
    }

    #[test]
    fn select_out_of_range_is_a_hard_error() {
        let (mut controller, command_rx) = controller_with(&["a"]);
        assert!(
            controller
                .handle_intent(TransportIntent::SelectTrack(7))
                .is_err()
        );
        assert!(drain(&command_rx).is_empty());
    }
}
