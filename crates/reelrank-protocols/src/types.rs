//! Catalog domain types.
//!
//! Identifiers crossing any interface are opaque strings; storage-specific
//! key types never leave the store that assigned them.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

opaque_id!(
    /// Store-assigned item identifier.
    ItemId
);

opaque_id!(
    /// User identifier as recorded in the event log.
    UserId
);

/// A catalog item (movie). Read-only from the ranking engine's perspective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,

    pub title: String,

    #[serde(default)]
    pub director: String,

    /// Actor names in billing order.
    #[serde(default)]
    pub cast: Vec<String>,

    #[serde(default)]
    pub release_year: i32,

    /// Quality rating on a 0-10 scale. Absent ratings score as 0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
}

impl Item {
    pub fn new(id: impl Into<ItemId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            director: String::new(),
            cast: Vec::new(),
            release_year: 0,
            rating: None,
        }
    }

    pub fn with_director(mut self, director: impl Into<String>) -> Self {
        self.director = director.into();
        self
    }

    pub fn with_cast(mut self, cast: Vec<String>) -> Self {
        self.cast = cast;
        self
    }

    pub fn with_release_year(mut self, year: i32) -> Self {
        self.release_year = year;
        self
    }

    pub fn with_rating(mut self, rating: f32) -> Self {
        self.rating = Some(rating);
        self
    }

    /// Stored rating, or 0 when the record has none.
    pub fn rating_or_default(&self) -> f32 {
        self.rating.unwrap_or(0.0)
    }
}

/// A single watch of an item by a user. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchEvent {
    pub id: String,
    pub item_id: ItemId,
    pub user_id: UserId,
    pub watched_at: DateTime<Utc>,
}

/// A user review of an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    pub item_id: ItemId,
    pub user_id: UserId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,

    #[serde(default)]
    pub comment: String,

    pub created_at: DateTime<Utc>,
}

/// One row of the "most watched recently" aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchCount {
    pub item_id: ItemId,
    pub title: String,
    pub release_year: i32,
    pub watch_count: u64,
}

/// Sub-scores that produced a fused score. Unused signals stay `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SignalBreakdown {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semantic: Option<f32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub lexical: Option<f32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub popularity: Option<f32>,

    /// Store-native relevance, set only by basic lexical search.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_relevance: Option<f32>,
}

/// An item paired with its relevance score for one ranking pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub item: Item,
    pub score: f32,
    #[serde(default)]
    pub signals: SignalBreakdown,
}

impl ScoredCandidate {
    pub fn new(item: Item, score: f32, signals: SignalBreakdown) -> Self {
        Self {
            item,
            score,
            signals,
        }
    }
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod tests;
