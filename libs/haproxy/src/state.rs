//! Target states and display emphasis for raw status strings.

use std::fmt;

/// A state transition an operator can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetState {
    /// Serving traffic.
    Ready,
    /// Stop new traffic, finish existing sessions.
    Drain,
    /// Fully removed from rotation.
    Maint,
}

impl TargetState {
    /// Action token the HAProxy stats endpoint expects.
    pub fn action(self) -> &'static str {
        match self {
            TargetState::Ready => "ready",
            TargetState::Drain => "drain",
            TargetState::Maint => "maint",
        }
    }
}

impl fmt::Display for TargetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TargetState::Ready => "READY",
            TargetState::Drain => "DRAIN",
            TargetState::Maint => "MAINT",
        };
        f.write_str(label)
    }
}

/// Display emphasis for a raw status string.
///
/// Cosmetic only: the raw string drives every control decision. HAProxy
/// appends node-specific suffixes ("UP 1/2" while a check settles), which
/// is why the prefix case exists and why no control path may classify.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusEmphasis {
    /// Exactly `UP`.
    Up,
    /// Starts with `UP` but carries a suffix.
    UpTransitional,
    Drain,
    Maint,
    Down,
    /// Anything the vocabulary does not recognize.
    Other,
}

impl StatusEmphasis {
    pub fn classify(status: &str) -> Self {
        match status {
            "UP" => StatusEmphasis::Up,
            "DRAIN" => StatusEmphasis::Drain,
            "MAINT" => StatusEmphasis::Maint,
            "DOWN" => StatusEmphasis::Down,
            s if s.starts_with("UP") => StatusEmphasis::UpTransitional,
            _ => StatusEmphasis::Other,
        }
    }
}
