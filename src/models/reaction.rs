use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// The two reaction kinds. Anything else is rejected at the boundary
/// before it reaches the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionKind {
    Like,
    Dislike,
}

impl ReactionKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Dislike => "dislike",
        }
    }
}

impl fmt::Display for ReactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReactionKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "like" => Ok(Self::Like),
            "dislike" => Ok(Self::Dislike),
            _ => Err(()),
        }
    }
}

/// What a reaction is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionTarget {
    Post(i64),
    Comment(i64),
}

/// Aggregate counts for one target, recomputed after every toggle.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct ReactionCounts {
    pub likes: u64,
    pub dislikes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_through_str() {
        assert_eq!("like".parse(), Ok(ReactionKind::Like));
        assert_eq!("dislike".parse(), Ok(ReactionKind::Dislike));
        assert_eq!(ReactionKind::Like.as_str(), "like");
    }

    #[test]
    fn unknown_kind_is_rejected() {
        assert!(ReactionKind::from_str("love").is_err());
        assert!(ReactionKind::from_str("LIKE").is_err());
        assert!(ReactionKind::from_str("").is_err());
    }
}
