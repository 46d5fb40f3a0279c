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

//! Remote playlist retrieval.
//!
//! This module fetches the user's playlist from the configured server on a
//! background worker thread and broadcasts the result back to the main
//! event loop. The request carries the configured credentials; the payload
//! is accepted only when its embedded status code is `200`, anything else
//! is a hard failure with no retry.

use std::{sync::mpsc::Sender, thread};

use serde::{Deserialize, Serialize};

use crate::{config::AppConfig, error::PlayerError, events::AppEvent, model::Track};

const PLAYLIST_ENDPOINT: &str = "/get_my_music";

#[derive(Serialize)]
struct PlaylistRequest<'a> {
    user_name: &'a str,
    key: &'a str,
}

/// The raw response envelope. `content` is a track list only on success;
/// on failure the server puts junk there, so it is decoded in a second
/// phase after the status code has been checked.
#[derive(Deserialize)]
struct PlaylistResponse {
    code: u32,
    content: serde_json::Value,
}

#[derive(Deserialize)]
struct RemoteTrack {
    name: String,
    url: String,
}

/// Spawns a background thread to fetch the playlist once at startup.
///
/// The outcome is broadcast as an [`AppEvent`]: the materialized track
/// list on success, a single `PlaylistUnavailable` notification otherwise.
pub(crate) fn spawn_fetch_worker(config: &AppConfig, event_tx: Sender<AppEvent>) {
    let config = config.clone();

    thread::spawn(move || {
        let event = match fetch_playlist(&config) {
            Ok(tracks) => AppEvent::PlaylistLoaded(tracks),
            Err(e) => AppEvent::Error(e.to_string()),
        };
        let _ = event_tx.send(event);
    });
}

/// Requests the playlist from the configured origin.
fn fetch_playlist(config: &AppConfig) -> Result<Vec<Track>, PlayerError> {
    let url = format!("{}{}", config.origin, PLAYLIST_ENDPOINT);

    let response = reqwest::blocking::Client::new()
        .post(&url)
        .json(&PlaylistRequest {
            user_name: &config.user_name,
            key: &config.key,
        })
        .send()
        .map_err(|e| PlayerError::PlaylistUnavailable(e.to_string()))?;

    let body = response
        .text()
        .map_err(|e| PlayerError::PlaylistUnavailable(e.to_string()))?;

    parse_playlist(&config.origin, &body)
}

/// Decodes the response payload into an ordered track list.
///
/// Track URLs may be server-relative (the original backend serves
/// `/music_temp/...` paths); those are resolved against the configured
/// origin.
fn parse_playlist(origin: &str, body: &str) -> Result<Vec<Track>, PlayerError> {
    let response: PlaylistResponse = serde_json::from_str(body)
        .map_err(|e| PlayerError::PlaylistUnavailable(format!("malformed response: {}", e)))?;

    if response.code != 200 {
        return Err(PlayerError::PlaylistUnavailable(format!(
            "server returned code {}",
            response.code
        )));
    }

    let entries: Vec<RemoteTrack> = serde_json::from_value(response.content)
        .map_err(|e| PlayerError::PlaylistUnavailable(format!("malformed track list: {}", e)))?;

    Ok(entries
        .into_iter()
        .map(|entry| Track {
            name: entry.name,
            uri: resolve_uri(origin, &entry.url),
        })
        .collect())
}

fn resolve_uri(origin: &str, url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("{}{}", origin.trim_end_matches('/'), url)
    }
}
