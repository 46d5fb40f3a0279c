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

//! Indicator synchronisation.
//!
//! Pure, stateless mapping between engine fractions in `[0, 1]` and the
//! `0..=100` values shown on the progress and volume indicators. The
//! progress projection tolerates an unknown duration by rendering a
//! neutral (zero) position instead of propagating an invalid number.

use crate::player::KnownDuration;

/// Maps an engine fraction to an indicator value, clamping out-of-range
/// input.
pub(crate) fn to_indicator(fraction: f64) -> u8 {
    (fraction.clamp(0.0, 1.0) * 100.0).round() as u8
}

/// Maps an indicator value back to an engine fraction.
pub(crate) fn to_fraction(value: u8) -> f64 {
    f64::from(value.min(100)) / 100.0
}

/// Moves an indicator value by a signed delta, staying within `0..=100`.
pub(crate) fn nudge(value: u8, delta: i8) -> u8 {
    (i16::from(value) + i16::from(delta)).clamp(0, 100) as u8
}

/// Projects an elapsed time onto the progress indicator. Unknown duration
/// renders the neutral position.
pub(crate) fn position(elapsed_seconds: f64, duration: Option<KnownDuration>) -> u8 {
    duration
        .map(|duration| to_indicator(duration.fraction_at(elapsed_seconds)))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indicator_round_trips_through_fraction() {
        assert_eq!(to_indicator(0.0), 0);
        assert_eq!(to_indicator(0.5), 50);
        assert_eq!(to_indicator(1.0), 100);
        assert_eq!(to_fraction(50), 0.5);
        assert_eq!(to_indicator(to_fraction(37)), 37);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        assert_eq!(to_indicator(-0.5), 0);
        assert_eq!(to_indicator(2.0), 100);
        assert_eq!(to_indicator(f64::NAN), 0);
        assert_eq!(to_fraction(200), 1.0);
    }

    #[test]
    fn nudge_stays_within_bounds() {
        assert_eq!(nudge(50, 5), 55);
        assert_eq!(nudge(3, -5), 0);
        assert_eq!(nudge(98, 5), 100);
    }

    #[test]
    fn unknown_duration_renders_neutral_position() {
        assert_eq!(position(30.0, None), 0);

        let duration = KnownDuration::new(120.0).unwrap();
        assert_eq!(position(30.0, Some(duration)), 25);
        assert_eq!(position(500.0, Some(duration)), 100);
    }
}
