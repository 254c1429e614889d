//! Mood model

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Emotional tag attached to an entry.
///
/// The backend stores moods as a Postgres enum of lowercase names, so the
/// serde representation is the lowercase variant name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    Sad,
    Excited,
    Calm,
    Anxious,
    Grateful,
    Angry,
    Peaceful,
}

impl Mood {
    /// Every mood in picker order.
    pub const ALL: [Self; 8] = [
        Self::Happy,
        Self::Sad,
        Self::Excited,
        Self::Calm,
        Self::Anxious,
        Self::Grateful,
        Self::Angry,
        Self::Peaceful,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Happy => "happy",
            Self::Sad => "sad",
            Self::Excited => "excited",
            Self::Calm => "calm",
            Self::Anxious => "anxious",
            Self::Grateful => "grateful",
            Self::Angry => "angry",
            Self::Peaceful => "peaceful",
        }
    }

    #[must_use]
    pub const fn emoji(self) -> &'static str {
        match self {
            Self::Happy => "😊",
            Self::Sad => "😢",
            Self::Excited => "🎉",
            Self::Calm => "😌",
            Self::Anxious => "😰",
            Self::Grateful => "🙏",
            Self::Angry => "😠",
            Self::Peaceful => "☮️",
        }
    }

    /// Capitalized display name, e.g. `Happy`.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Happy => "Happy",
            Self::Sad => "Sad",
            Self::Excited => "Excited",
            Self::Calm => "Calm",
            Self::Anxious => "Anxious",
            Self::Grateful => "Grateful",
            Self::Angry => "Angry",
            Self::Peaceful => "Peaceful",
        }
    }

    /// Picker label combining emoji and name, e.g. `😊 Happy`.
    #[must_use]
    pub fn label(self) -> String {
        format!("{} {}", self.emoji(), self.display_name())
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mood {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|mood| mood.as_str() == normalized)
            .ok_or_else(|| Error::InvalidInput(format!("Unknown mood: '{}'", s.trim())))
    }
}
