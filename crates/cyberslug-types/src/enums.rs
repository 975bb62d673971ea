//! Enumeration types for the Cyberslug simulation.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Number of odor channels carried by the odor field.
pub const ODOR_CHANNEL_COUNT: usize = 4;

/// One concentration (or sensory signal) per odor channel, indexed by
/// [`OdorChannel::index`].
pub type OdorVector = [f64; ODOR_CHANNEL_COUNT];

// ---------------------------------------------------------------------------
// Odor channels
// ---------------------------------------------------------------------------

/// A distinct odor type diffusing through the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum OdorChannel {
    /// Generic food odor (betaine) shared by all edible prey.
    Betaine,
    /// Odor specific to *Hermissenda* prey.
    Hermi,
    /// Odor specific to *Flabellina* prey.
    Flab,
    /// Odor of the drug-laced decoy prey.
    Drug,
}

impl OdorChannel {
    /// All channels in field storage order.
    pub const ALL: [Self; ODOR_CHANNEL_COUNT] = [Self::Betaine, Self::Hermi, Self::Flab, Self::Drug];

    /// Position of this channel inside an [`OdorVector`].
    pub const fn index(self) -> usize {
        match self {
            Self::Betaine => 0,
            Self::Hermi => 1,
            Self::Flab => 2,
            Self::Drug => 3,
        }
    }
}

// ---------------------------------------------------------------------------
// Prey kinds
// ---------------------------------------------------------------------------

/// Category of a prey object. Used to classify encounters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum PreyKind {
    /// *Hermissenda*: palatable, learned as appetitive.
    Hermi,
    /// *Flabellina*: noxious, learned as aversive.
    Flab,
    /// Faux-*Flabellina* carrying the drug odor. Rewarding but not nutritious.
    Drug,
}

impl PreyKind {
    /// All prey kinds in population build order.
    pub const ALL: [Self; 3] = [Self::Hermi, Self::Flab, Self::Drug];

    /// The odor channel that identifies this kind specifically.
    pub const fn signature_channel(self) -> OdorChannel {
        match self {
            Self::Hermi => OdorChannel::Hermi,
            Self::Flab => OdorChannel::Flab,
            Self::Drug => OdorChannel::Drug,
        }
    }

    /// Whether eating this kind adds to the agent's nutrition.
    pub const fn is_nutritious(self) -> bool {
        match self {
            Self::Hermi | Self::Flab => true,
            Self::Drug => false,
        }
    }
}

impl core::fmt::Display for PreyKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::Hermi => "hermi",
            Self::Flab => "flab",
            Self::Drug => "drug",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_indices_are_dense() {
        for (expected, channel) in OdorChannel::ALL.iter().enumerate() {
            assert_eq!(channel.index(), expected);
        }
    }

    #[test]
    fn drug_is_not_nutritious() {
        assert!(PreyKind::Hermi.is_nutritious());
        assert!(PreyKind::Flab.is_nutritious());
        assert!(!PreyKind::Drug.is_nutritious());
    }

    #[test]
    fn prey_kind_serializes_snake_case() {
        let json = serde_json::to_string(&PreyKind::Hermi).ok();
        assert_eq!(json.as_deref(), Some("\"hermi\""));
        let parsed: Result<PreyKind, _> = serde_json::from_str("\"drug\"");
        assert_eq!(parsed.ok(), Some(PreyKind::Drug));
    }
}
