use serde::{Deserialize, Serialize};

/// Rule strictness, chosen from the size of the wardrobe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleMode {
    Disabled,
    Loose,
    Normal,
    Strict,
}

impl RuleMode {
    pub const fn for_wardrobe_size(items: usize) -> Self {
        match items {
            0..=4 => Self::Disabled,
            5..=9 => Self::Loose,
            10..=19 => Self::Normal,
            _ => Self::Strict,
        }
    }

    /// Largest tolerated formality gap between paired garments.
    pub const fn formality_threshold(self) -> Option<u8> {
        match self {
            Self::Disabled => None,
            Self::Loose => Some(3),
            Self::Normal => Some(2),
            Self::Strict => Some(1),
        }
    }

    pub const fn is_strict(self) -> bool {
        matches!(self, Self::Strict)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Disabled => "disabled",
            Self::Loose => "loose",
            Self::Normal => "normal",
            Self::Strict => "strict",
        }
    }
}
