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

//! MPV-backed playback worker and event translation.
//!
//! This module provides the core audio playback logic, leveraging `libmpv`
//! for audio decoding and playback control. It manages a background worker
//! thread that bridges the gap between the engine's command-based interface
//! and the low-level MPV property observation system.
//!
//! # Architecture
//!
//! The worker operates using a dual-channel communication pattern:
//! 1. **Command Channel**: Receives [`EngineCommand`]s from the
//!    [`PlaybackEngine`](crate::player::PlaybackEngine) handle.
//! 2. **Event Channel**: Broadcasts generation-tagged
//!    [`EngineEvent`](crate::player::EngineEvent)s so the transport can
//!    tell events of the current source from late events of a superseded
//!    one.
//!
//! MPV runs with `keep-open=always`, so reaching the end of a source
//! pauses the core on it instead of unloading it. That keeps the source
//! available for the rewind-and-hold at the end of the playlist and for a
//! later resume, and it means end of stream is signalled by the rising
//! edge of the `eof-reached` property rather than by an end-file event
//! (which `keep-open` suppresses for natural ends).

use anyhow::{Context, Result};
use mpv::Format;
use std::{
    sync::mpsc::{Receiver, Sender},
    thread,
};

use crate::{
    events::AppEvent,
    player::{EngineEvent, KnownDuration},
};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum EngineCommand {
    Load { uri: String, generation: u64 },
    Play,
    Pause,
    SeekFraction(f64),
    SetVolumeFraction(f64),
    SetLoop(bool),
}

// Simplified view of the MPV pause/idle flags, used to detect the
// transition into active playback.
#[derive(Clone, Copy, Debug, PartialEq)]
enum WorkerState {
    Playing,
    Paused,
    Stopped,
}

/// Mirror of the observed MPV properties, plus the generation of the load
/// the worker is currently reporting on.
struct WorkerStatus {
    generation: u64,
    duration: Option<KnownDuration>,
    is_paused: bool,
    is_idle: bool,
    eof_reached: bool,
    state: WorkerState,
}

impl WorkerStatus {
    fn new() -> Self {
        Self {
            generation: 0,
            duration: None,
            is_paused: false,
            is_idle: true,
            eof_reached: false,
            state: WorkerState::Stopped,
        }
    }

    fn derived_state(&self) -> WorkerState {
        if self.is_idle {
            WorkerState::Stopped
        } else if self.is_paused {
            WorkerState::Paused
        } else {
            WorkerState::Playing
        }
    }
}

/// Spawns the audio worker thread to process playback commands.
///
/// This function takes ownership of the command receiver and the event
/// sender, moving them into a dedicated background thread.
///
/// If the internal worker returns an error, it is caught here and broadcast
/// as a fatal application event.
pub(crate) fn spawn_engine_worker(command_rx: Receiver<EngineCommand>, event_tx: Sender<AppEvent>) {
    let error_tx = event_tx.clone();

    thread::spawn(move || {
        if let Err(e) = engine_worker(command_rx, event_tx) {
            let _ = error_tx.send(AppEvent::FatalError(format!("MPV worker failure: {:?}", e)));
        }
    });
}

/// The primary execution loop for the playback backend.
///
/// Initializes a local `libmpv` context and alternates between draining
/// pending commands and polling for MPV events.
///
/// # Errors
///
/// Returns an error if the MPV context fails to initialize or if the
/// event channel to the application has been dropped.
fn engine_worker(command_rx: Receiver<EngineCommand>, event_tx: Sender<AppEvent>) -> Result<()> {
    let mut handler = (|| {
        let mut builder = mpv::MpvHandlerBuilder::new().context("Failed to create MPV builder")?;
        builder
            .set_option("vo", "null")
            .context("Failed to set no video output")?;
        // Hold the source, paused at its end, instead of unloading it on
        // EOF; the end of stream is then visible as eof-reached
        builder
            .set_option("keep-open", "always")
            .context("Failed to set keep-open")?;
        builder.build().context("Failed to build MPV handler")
    })()?;

    handler
        .observe_property::<f64>("duration", 0)
        .context("Failed to observe duration")?;
    handler
        .observe_property::<bool>("pause", 0)
        .context("Failed to observe pause")?;
    handler
        .observe_property::<f64>("time-pos", 0)
        .context("Failed to observe time-pos")?;
    handler
        .observe_property::<f64>("volume", 0)
        .context("Failed to observe volume")?;
    handler
        .observe_property::<bool>("idle-active", 0)
        .context("Failed to observe idle-active")?;
    handler
        .observe_property::<bool>("eof-reached", 0)
        .context("Failed to observe eof-reached")?;

    let mut status = WorkerStatus::new();

    loop {
        process_commands(&mut handler, &command_rx, &mut status, &event_tx)?;

        if let Some(mpv_event) = handler.wait_event(0.05) {
            dispatch_mpv_event(&mut status, mpv_event, &event_tx)?;
        }
    }
}

/// Drains and executes all pending commands from the engine handle.
fn process_commands(
    handler: &mut mpv::MpvHandler,
    command_rx: &Receiver<EngineCommand>,
    status: &mut WorkerStatus,
    event_tx: &Sender<AppEvent>,
) -> Result<()> {
    while let Ok(command) = command_rx.try_recv() {
        match command {
            EngineCommand::Load {
                uri,
                generation: load_generation,
            } => {
                // Deliver events still queued by the superseded source
                // before retagging, so a late end or failure keeps the
                // old generation and gets discarded by the transport
                while let Some(mpv_event) = handler.wait_event(0.0) {
                    dispatch_mpv_event(status, mpv_event, event_tx)?;
                }

                // A new load supersedes the previous source wholesale
                status.generation = load_generation;
                status.duration = None;
                status.eof_reached = false;

                if let Err(e) = handler.command(&["loadfile", &uri, "replace"]) {
                    event_tx.send(AppEvent::Engine(EngineEvent::Failed {
                        generation: load_generation,
                        reason: format!("Failed to load {}: {:?}", uri, e),
                    }))?;
                    continue;
                }
                // Loading must not auto-play; the transport issues Play
                // separately
                handler.set_property("pause", true)?;
            }
            EngineCommand::Play => {
                handler.set_property("pause", false)?;
            }
            EngineCommand::Pause => {
                handler.set_property("pause", true)?;
            }
            EngineCommand::SeekFraction(fraction) => {
                // Percent seek; MPV rejects it while no source is seekable
                // yet, which is exactly the silent drop the transport wants
                let percent = (fraction * 100.0).to_string();
                handler.command(&["seek", &percent, "absolute-percent"]).ok();
            }
            EngineCommand::SetVolumeFraction(fraction) => {
                handler.set_property("volume", fraction.clamp(0.0, 1.0) * 100.0)?;
            }
            EngineCommand::SetLoop(enabled) => {
                let value = if enabled { "inf" } else { "no" };
                handler.set_property("loop-file", value)?;
            }
        }
    }

    Ok(())
}

/// Translates one MPV event and broadcasts whatever engine events it
/// yields, including the transition into active playback.
fn dispatch_mpv_event(
    status: &mut WorkerStatus,
    mpv_event: mpv::Event,
    event_tx: &Sender<AppEvent>,
) -> Result<()> {
    let engine_event = match mpv_event {
        mpv::Event::PropertyChange { name, change, .. } => {
            translate_property_change(status, name, change)
        }
        mpv::Event::EndFile(result) => match result {
            Ok(reason) => end_file_event(status, reason),
            Err(e) => Some(EngineEvent::Failed {
                generation: status.generation,
                reason: format!("Playback failed: {:?}", e),
            }),
        },
        _ => None,
    };

    let new_state = status.derived_state();
    if new_state != status.state {
        status.state = new_state;
        if new_state == WorkerState::Playing {
            event_tx
                .send(AppEvent::Engine(EngineEvent::Started {
                    generation: status.generation,
                }))
                .context("Failed to send started event")?;
        }
    }

    if let Some(event) = engine_event {
        event_tx
            .send(AppEvent::Engine(event))
            .context("Failed to send engine event")?;
    }

    Ok(())
}

/// Applies an observed property change to the worker status, yielding the
/// engine event it amounts to, if any.
fn translate_property_change(
    status: &mut WorkerStatus,
    name: &str,
    change: Format,
) -> Option<EngineEvent> {
    match (name, change) {
        ("duration", Format::Double(seconds)) => {
            status.duration = KnownDuration::new(seconds);
            None
        }
        ("time-pos", Format::Double(seconds)) if seconds >= 0.0 => {
            Some(EngineEvent::TimeUpdated {
                generation: status.generation,
                elapsed_seconds: seconds,
                duration: status.duration,
            })
        }
        ("volume", Format::Double(volume)) => Some(EngineEvent::VolumeChanged {
            volume: (volume / 100.0).clamp(0.0, 1.0),
        }),
        ("pause", Format::Flag(pause)) => {
            status.is_paused = pause;
            None
        }
        ("idle-active", Format::Flag(idle_active)) => {
            status.is_idle = idle_active;
            None
        }
        ("eof-reached", Format::Flag(eof)) => {
            // Under keep-open the natural end of stream is the rising
            // edge of this flag; it clears again on seek or load
            let ended = eof && !status.eof_reached;
            status.eof_reached = eof;
            ended.then_some(EngineEvent::Ended {
                generation: status.generation,
            })
        }
        _ => None,
    }
}

/// Maps an end-file reason onto an engine event. Natural EOF normally
/// arrives via `eof-reached` instead; a duplicate end here is harmless
/// because the transport's generation check drops whichever one is stale.
fn end_file_event(status: &WorkerStatus, reason: mpv::EndFileReason) -> Option<EngineEvent> {
    match reason {
        mpv::EndFileReason::MPV_END_FILE_REASON_EOF => Some(EngineEvent::Ended {
            generation: status.generation,
        }),
        mpv::EndFileReason::MPV_END_FILE_REASON_ERROR => Some(EngineEvent::Failed {
            generation: status.generation,
            reason: "Playback ended with a decoder error".to_string(),
        }),
        // STOP and friends arrive when a load replaces the source
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_at_generation(generation: u64) -> WorkerStatus {
        let mut status = WorkerStatus::new();
        status.generation = generation;
        status
    }

    #[test]
    fn end_of_stream_is_the_rising_edge_of_eof_reached() {
        let mut status = status_at_generation(3);

        assert_eq!(
            translate_property_change(&mut status, "eof-reached", Format::Flag(true)),
            Some(EngineEvent::Ended { generation: 3 })
        );

        // The flag staying up must not end the stream again
        assert_eq!(
            translate_property_change(&mut status, "eof-reached", Format::Flag(true)),
            None
        );

        // It clears on seek or load, and the next end fires again
        assert_eq!(
            translate_property_change(&mut status, "eof-reached", Format::Flag(false)),
            None
        );
        assert_eq!(
            translate_property_change(&mut status, "eof-reached", Format::Flag(true)),
            Some(EngineEvent::Ended { generation: 3 })
        );
    }

    #[test]
    fn end_file_reasons_map_to_end_or_failure() {
        let status = status_at_generation(1);

        assert_eq!(
            end_file_event(&status, mpv::EndFileReason::MPV_END_FILE_REASON_EOF),
            Some(EngineEvent::Ended { generation: 1 })
        );
        assert!(matches!(
            end_file_event(&status, mpv::EndFileReason::MPV_END_FILE_REASON_ERROR),
            Some(EngineEvent::Failed { generation: 1, .. })
        ));
        assert_eq!(
            end_file_event(&status, mpv::EndFileReason::MPV_END_FILE_REASON_STOP),
            None
        );
    }

    #[test]
    fn events_translated_before_a_load_keep_the_old_generation() {
        let mut status = status_at_generation(1);

        // An end already queued by the superseded source is delivered
        // under its own generation...
        assert_eq!(
            end_file_event(&status, mpv::EndFileReason::MPV_END_FILE_REASON_EOF),
            Some(EngineEvent::Ended { generation: 1 })
        );

        // ...and only afterwards does the worker retag for the new load
        status.generation = 2;
        status.duration = None;
        status.eof_reached = false;

        assert_eq!(
            translate_property_change(&mut status, "time-pos", Format::Double(0.5)),
            Some(EngineEvent::TimeUpdated {
                generation: 2,
                elapsed_seconds: 0.5,
                duration: None,
            })
        );
    }

    #[test]
    fn time_updates_carry_the_validated_duration() {
        let mut status = status_at_generation(1);

        // Junk duration stays unknown
        assert_eq!(
            translate_property_change(&mut status, "duration", Format::Double(0.0)),
            None
        );
        assert_eq!(
            translate_property_change(&mut status, "time-pos", Format::Double(3.0)),
            Some(EngineEvent::TimeUpdated {
                generation: 1,
                elapsed_seconds: 3.0,
                duration: None,
            })
        );

        translate_property_change(&mut status, "duration", Format::Double(120.0));
        assert_eq!(
            translate_property_change(&mut status, "time-pos", Format::Double(4.0)),
            Some(EngineEvent::TimeUpdated {
                generation: 1,
                elapsed_seconds: 4.0,
                duration: KnownDuration::new(120.0),
            })
        );
    }

    #[test]
    fn volume_changes_are_reported_as_fractions() {
        let mut status = status_at_generation(1);

        assert_eq!(
            translate_property_change(&mut status, "volume", Format::Double(40.0)),
            Some(EngineEvent::VolumeChanged { volume: 0.4 })
        );
        // MPV volume can exceed 100; the fraction is clamped
        assert_eq!(
            translate_property_change(&mut status, "volume", Format::Double(130.0)),
            Some(EngineEvent::VolumeChanged { volume: 1.0 })
        );
    }

    #[test]
    fn derived_state_reflects_pause_and_idle_flags() {
        let mut status = WorkerStatus::new();
        assert_eq!(status.derived_state(), WorkerState::Stopped);

        translate_property_change(&mut status, "idle-active", Format::Flag(false));
        assert_eq!(status.derived_state(), WorkerState::Playing);

        translate_property_change(&mut status, "pause", Format::Flag(true));
        assert_eq!(status.derived_state(), WorkerState::Paused);
    }
}
