//! Order Number Formatting
//!
//! The external order number is a pure function of `(sequence, channel)`:
//! `№` followed by the zero-padded decimal sequence and the channel code,
//! e.g. sequence 42 in channel AS renders as `№00042/AS`. Recomputing the
//! number for the same inputs always yields the same string; consumers
//! treat it as opaque and display-only.

use crate::models::Channel;

/// Leading mark of every order number
pub const NUMBER_PREFIX: char = '№';

/// Zero-pad width of the sequence part. Sequences wider than this render
/// at natural width rather than truncating.
pub const SEQUENCE_WIDTH: usize = 5;

/// Format the human-facing order number for a minted sequence
pub fn format(sequence: i64, channel: Channel) -> String {
    format!(
        "{NUMBER_PREFIX}{sequence:0width$}/{code}",
        width = SEQUENCE_WIDTH,
        code = channel.code(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_zero_pads_to_five_digits() {
        assert_eq!(format(42, Channel::Atelier), "№00042/AS");
        assert_eq!(format(1, Channel::Lab), "№00001/LAB");
        assert_eq!(format(99999, Channel::Atelier), "№99999/AS");
    }

    #[test]
    fn test_format_is_deterministic() {
        assert_eq!(format(42, Channel::Atelier), format(42, Channel::Atelier));
        assert_eq!(format(7, Channel::Lab), format(7, Channel::Lab));
    }

    #[test]
    fn test_format_beyond_pad_width_keeps_all_digits() {
        assert_eq!(format(123456, Channel::Atelier), "№123456/AS");
    }

    #[test]
    fn test_channels_never_collide() {
        assert_ne!(format(1, Channel::Atelier), format(1, Channel::Lab));
    }
}
