//! Type-safe integer identifier wrappers.
//!
//! Every entity exposed over the API has a strongly-typed ID so that a
//! `TeamId` can never be passed where a `PlayerId` is expected. On the
//! wire every ID is a plain JSON number.
//!
//! IDs are allocated sequentially per entity type by the catalog, which
//! is what keeps them unique within their type.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Generates a newtype wrapper around `u32` with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub u32);

        impl $name {
            /// Wrap a raw identifier.
            pub const fn new(raw: u32) -> Self {
                Self(raw)
            }

            /// Return the inner `u32` value.
            pub const fn into_inner(self) -> u32 {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u32> for $name {
            fn from(id: u32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for u32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for a tournament.
    TournamentId
}

define_id! {
    /// Unique identifier for a team entered in a tournament.
    TeamId
}

define_id! {
    /// Unique identifier for a player on a team.
    PlayerId
}

define_id! {
    /// Unique identifier for a room games are played in.
    RoomId
}

define_id! {
    /// Unique identifier for a round of play.
    RoundId
}

define_id! {
    /// Unique identifier for a single game between two teams.
    GameId
}

define_id! {
    /// Unique identifier for a question.
    QuestionId
}

define_id! {
    /// Unique identifier for a registered user.
    UserId
}

define_id! {
    /// Unique identifier for a recorded scoring event.
    ScoringEventId
}

define_id! {
    /// Unique identifier for an answer history entry.
    HistoryId
}

define_id! {
    /// Unique identifier for a question bookmark.
    BookmarkId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_serializes_as_bare_number() {
        let json = serde_json::to_string(&TournamentId::new(7)).ok();
        assert_eq!(json.as_deref(), Some("7"));
    }

    #[test]
    fn id_deserializes_from_number() {
        let id: Result<PlayerId, _> = serde_json::from_str("42");
        assert_eq!(id.ok(), Some(PlayerId::new(42)));
    }

    #[test]
    fn id_display_matches_inner() {
        let id = QuestionId::new(19);
        assert_eq!(id.to_string(), "19");
        assert_eq!(u32::from(id), 19);
    }
}
