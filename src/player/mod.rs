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

//! Audio playback engine.
//!
//! This module provides the [`PlaybackEngine`] handle used by the transport
//! controller to command music playback. It manages a background worker
//! thread that interfaces with the underlying audio library (MPV), ensuring
//! that heavy audio operations do not block the main application thread.
//!
//! Commands are fire-and-forget; completion and failure are observed later
//! through [`EngineEvent`]s on the application event channel. Each `load`
//! is tagged with a monotonically increasing generation, and every
//! source-scoped event carries the generation of the load that produced it,
//! so a consumer can discard late events from a superseded source.

mod commands;

use std::sync::mpsc::{self, Sender};

use anyhow::Result;

use crate::events::AppEvent;
pub(crate) use commands::EngineCommand;

/// Duration of the loaded source, guaranteed finite and greater than zero.
///
/// "Duration not yet known" is expressed as `Option<KnownDuration>`, so the
/// NaN/zero/infinite checks happen once at construction instead of at each
/// use site.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct KnownDuration(f64);

impl KnownDuration {
    pub(crate) fn new(seconds: f64) -> Option<Self> {
        (seconds.is_finite() && seconds > 0.0).then_some(Self(seconds))
    }

    pub(crate) fn seconds(&self) -> f64 {
        self.0
    }

    /// Fraction of the duration covered by `elapsed` seconds, clamped to
    /// `[0, 1]`.
    pub(crate) fn fraction_at(&self, elapsed: f64) -> f64 {
        (elapsed / self.0).clamp(0.0, 1.0)
    }
}

/// Lifecycle notifications from the playback worker.
///
/// Events arrive in order on the application event channel and reflect the
/// latest engine state at emission time. `VolumeChanged` is a property of
/// the engine rather than of a loaded source and carries no generation.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum EngineEvent {
    /// The engine transitioned into actively playing the given load.
    Started { generation: u64 },
    /// Periodic position report for the given load.
    TimeUpdated {
        generation: u64,
        elapsed_seconds: f64,
        duration: Option<KnownDuration>,
    },
    /// Volume fraction in `[0, 1]`.
    VolumeChanged { volume: f64 },
    /// Natural end of stream. Never emitted while native looping is active.
    Ended { generation: u64 },
    /// The source could not be opened or playback broke down.
    Failed { generation: u64, reason: String },
}

/// A handle to the audio playback engine.
///
/// This struct acts as a command proxy; it does not perform audio
/// processing itself but instead sends instructions to a background worker
/// thread.
pub(crate) struct PlaybackEngine {
    /// Channel for sending commands to the background worker thread.
    command_tx: mpsc::Sender<EngineCommand>,
    /// Generation assigned to the most recent load.
    generation: u64,
}

impl PlaybackEngine {
    /// Spawns the audio worker thread and returns a new engine handle.
    ///
    /// # Arguments
    ///
    /// * `event_tx` - A channel to send application-level events (engine
    ///   lifecycle, errors) back to the main event loop.
    pub(crate) fn new(event_tx: Sender<AppEvent>) -> Result<Self> {
        let (command_tx, command_rx) = mpsc::channel::<EngineCommand>();

        commands::spawn_engine_worker(command_rx, event_tx);

        Ok(Self {
            command_tx,
            generation: 0,
        })
    }

    /// Builds a handle over a bare command channel with no worker attached,
    /// so the transport state machine can be exercised without an audio
    /// backend.
    #[cfg(test)]
    pub(crate) fn from_sender(command_tx: mpsc::Sender<EngineCommand>) -> Self {
        Self {
            command_tx,
            generation: 0,
        }
    }

    /// Instructs the worker to load a new source, superseding the current
    /// one. Loading does not start playback; issue [`play`](Self::play)
    /// afterwards.
    ///
    /// Returns the generation assigned to this load, against which the
    /// worker tags all events the source produces. Failure to open the
    /// source surfaces later as an [`EngineEvent::Failed`], mirroring a
    /// real decoder's asynchronous failure.
    pub(crate) fn load(&mut self, uri: &str) -> Result<u64> {
        self.generation += 1;
        self.command_tx.send(EngineCommand::Load {
            uri: uri.to_string(),
            generation: self.generation,
        })?;
        Ok(self.generation)
    }

    /// Starts or resumes playback. A no-op in the worker if already
    /// playing. Calling this without a prior load is a caller error.
    pub(crate) fn play(&self) -> Result<()> {
        self.command_tx.send(EngineCommand::Play)?;
        Ok(())
    }

    /// Pauses playback, keeping the current position. A no-op in the
    /// worker if already paused.
    pub(crate) fn pause(&self) -> Result<()> {
        self.command_tx.send(EngineCommand::Pause)?;
        Ok(())
    }

    /// Seeks to a fraction of the source duration.
    ///
    /// The worker performs a percent-based seek, which the underlying
    /// engine ignores while the duration is still unknown; callers guard
    /// with their own [`KnownDuration`] so an invalid seek is dropped
    /// rather than reported.
    pub(crate) fn seek_fraction(&self, fraction: f64) -> Result<()> {
        self.command_tx
            .send(EngineCommand::SeekFraction(fraction.clamp(0.0, 1.0)))?;
        Ok(())
    }

    /// Sets the playback volume as a fraction in `[0, 1]`, clamped. The
    /// resulting level is reported back via [`EngineEvent::VolumeChanged`].
    pub(crate) fn set_volume_fraction(&self, fraction: f64) -> Result<()> {
        self.command_tx
            .send(EngineCommand::SetVolumeFraction(fraction.clamp(0.0, 1.0)))?;
        Ok(())
    }

    /// Enables or disables native single-track looping. While enabled the
    /// engine restarts the source itself and [`EngineEvent::Ended`] never
    /// fires.
    pub(crate) fn set_loop(&self, enabled: bool) -> Result<()> {
        self.command_tx.send(EngineCommand::SetLoop(enabled))?;
        Ok(())
    }
}
