//! Writing-screen themes per mood.

use crate::models::Mood;

/// Style tokens for the writing screen. Tokens are Tailwind class names so
/// that any front end sharing the backend renders the same palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoodTheme {
    pub background: &'static str,
    pub card: &'static str,
    pub text: &'static str,
    pub accent: &'static str,
}

impl Mood {
    #[must_use]
    pub const fn theme(self) -> MoodTheme {
        match self {
            Self::Happy => MoodTheme {
                background: "bg-gradient-to-br from-yellow-50 to-orange-50",
                card: "bg-yellow-50/80",
                text: "text-yellow-900",
                accent: "border-yellow-200",
            },
            Self::Sad => MoodTheme {
                background: "bg-gradient-to-br from-blue-50 to-slate-100",
                card: "bg-blue-50/80",
                text: "text-blue-900",
                accent: "border-blue-200",
            },
            Self::Excited => MoodTheme {
                background: "bg-gradient-to-br from-pink-50 to-red-50",
                card: "bg-pink-50/80",
                text: "text-pink-900",
                accent: "border-pink-200",
            },
            Self::Calm => MoodTheme {
                background: "bg-gradient-to-br from-green-50 to-emerald-50",
                card: "bg-green-50/80",
                text: "text-green-900",
                accent: "border-green-200",
            },
            Self::Anxious => MoodTheme {
                background: "bg-gradient-to-br from-amber-50 to-yellow-50",
                card: "bg-amber-50/80",
                text: "text-amber-900",
                accent: "border-amber-200",
            },
            Self::Grateful => MoodTheme {
                background: "bg-gradient-to-br from-purple-50 to-violet-50",
                card: "bg-purple-50/80",
                text: "text-purple-900",
                accent: "border-purple-200",
            },
            Self::Angry => MoodTheme {
                background: "bg-gradient-to-br from-red-50 to-rose-50",
                card: "bg-red-50/80",
                text: "text-red-900",
                accent: "border-red-200",
            },
            Self::Peaceful => MoodTheme {
                background: "bg-gradient-to-br from-teal-50 to-cyan-50",
                card: "bg-teal-50/80",
                text: "text-teal-900",
                accent: "border-teal-200",
            },
        }
    }
}
