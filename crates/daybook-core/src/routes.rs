//! Screen routes: `/auth`, `/` and `/write/:mood[?entryId=<id>]`.

use std::fmt;

use crate::models::{EntryId, Mood};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Auth,
    Dashboard,
    Write {
        mood: Mood,
        entry_id: Option<EntryId>,
    },
    NotFound(String),
}

impl Route {
    pub const fn write(mood: Mood) -> Self {
        Self::Write {
            mood,
            entry_id: None,
        }
    }

    pub const fn edit(mood: Mood, entry_id: EntryId) -> Self {
        Self::Write {
            mood,
            entry_id: Some(entry_id),
        }
    }

    /// Resolve a path. A writing route whose mood is not a known mood
    /// (including `neutral`) redirects to the dashboard.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        let (path, query) = raw.split_once('?').unwrap_or((raw, ""));
        let path = path.trim_end_matches('/');

        match path {
            "" => Self::Dashboard,
            "/auth" => Self::Auth,
            _ => {
                let Some(segment) = path.strip_prefix("/write/") else {
                    return Self::NotFound(raw.to_string());
                };
                if segment.contains('/') {
                    return Self::NotFound(raw.to_string());
                }
                let segment = urlencoding::decode(segment)
                    .map(std::borrow::Cow::into_owned)
                    .unwrap_or_default();
                let Ok(mood) = segment.parse::<Mood>() else {
                    return Self::Dashboard;
                };
                Self::Write {
                    mood,
                    entry_id: query_entry_id(query),
                }
            }
        }
    }

    pub fn path(&self) -> String {
        match self {
            Self::Auth => "/auth".to_string(),
            Self::Dashboard => "/".to_string(),
            Self::Write { mood, entry_id } => match entry_id {
                Some(id) => format!("/write/{mood}?entryId={id}"),
                None => format!("/write/{mood}"),
            },
            Self::NotFound(path) => path.clone(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

fn query_entry_id(query: &str) -> Option<EntryId> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == "entryId")
        .and_then(|(_, value)| urlencoding::decode(value).ok())
        .and_then(|value| value.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_static_routes() {
        assert_eq!(Route::parse("/"), Route::Dashboard);
        assert_eq!(Route::parse("/auth"), Route::Auth);
        assert_eq!(
            Route::parse("/settings"),
            Route::NotFound("/settings".to_string())
        );
    }

    #[test]
    fn writing_route_carries_mood_and_entry_id() {
        let id = EntryId::generate();
        let route = Route::parse(&format!("/write/happy?entryId={id}"));
        assert_eq!(route, Route::edit(Mood::Happy, id));
        assert_eq!(Route::parse(&route.path()), route);
        assert_eq!(Route::parse("/write/calm"), Route::write(Mood::Calm));
    }

    #[test]
    fn unknown_mood_redirects_to_dashboard() {
        assert_eq!(Route::parse("/write/neutral"), Route::Dashboard);
        assert_eq!(Route::parse("/write/bored"), Route::Dashboard);
    }

    #[test]
    fn malformed_entry_id_is_ignored() {
        assert_eq!(
            Route::parse("/write/sad?entryId=nope"),
            Route::write(Mood::Sad)
        );
    }
}
