use serde::{Deserialize, Serialize};

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a raw database id.
            pub fn new(id: i64) -> Self {
                Self(id)
            }

            /// Returns the raw database id.
            pub fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

entity_id!(
    /// Identifier of a venue row.
    ///
    /// Kept distinct from [`ArtistId`] and [`ShowId`] so a venue id can never
    /// be passed where an artist id is expected.
    VenueId
);

entity_id!(
    /// Identifier of an artist row.
    ArtistId
);

entity_id!(
    /// Identifier of a show row.
    ShowId
);

/// The three kinds of persisted records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Venue,
    Artist,
    Show,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Venue => "venue",
            EntityKind::Artist => "artist",
            EntityKind::Show => "show",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reference to a show owner: either a venue or an artist.
///
/// Used wherever shows are aggregated "per entity".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ShowOwner {
    Venue(VenueId),
    Artist(ArtistId),
}

impl ShowOwner {
    pub fn kind(&self) -> EntityKind {
        match self {
            ShowOwner::Venue(_) => EntityKind::Venue,
            ShowOwner::Artist(_) => EntityKind::Artist,
        }
    }

    pub fn raw_id(&self) -> i64 {
        match self {
            ShowOwner::Venue(id) => id.as_i64(),
            ShowOwner::Artist(id) => id.as_i64(),
        }
    }
}

impl From<VenueId> for ShowOwner {
    fn from(id: VenueId) -> Self {
        ShowOwner::Venue(id)
    }
}

impl From<ArtistId> for ShowOwner {
    fn from(id: ArtistId) -> Self {
        ShowOwner::Artist(id)
    }
}

impl std::fmt::Display for ShowOwner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.kind(), self.raw_id())
    }
}
