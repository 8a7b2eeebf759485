//! Canonical unordered-pair key for conversations.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::id::UserId;

/// Error returned when both sides of a pair are the same user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("a conversation requires two distinct users")]
pub struct SelfPairError;

/// Canonical `(low, high)` form of an unordered user pair.
///
/// Construction through [`ConversationKey::new`] is the only way to obtain
/// a key, so `low < high` holds for every value in circulation. Lookups
/// keyed this way make `resolve(a, b)` and `resolve(b, a)` hit the same
/// conversation row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationKey {
    low: UserId,
    high: UserId,
}

impl ConversationKey {
    /// Canonicalizes `(a, b)`; argument order does not matter.
    pub fn new(a: UserId, b: UserId) -> Result<Self, SelfPairError> {
        if a == b {
            return Err(SelfPairError);
        }
        Ok(Self {
            low: a.min(b),
            high: a.max(b),
        })
    }

    /// Smaller user id of the pair.
    pub fn low(&self) -> UserId {
        self.low
    }

    /// Larger user id of the pair.
    pub fn high(&self) -> UserId {
        self.high
    }

    /// The side of the pair that is not `user`.
    pub fn other(&self, user: UserId) -> UserId {
        if user == self.low { self.high } else { self.low }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_is_order_independent() {
        let ab = ConversationKey::new(7, 3).unwrap();
        let ba = ConversationKey::new(3, 7).unwrap();
        assert_eq!(ab, ba);
        assert_eq!(ab.low(), 3);
        assert_eq!(ab.high(), 7);
    }

    #[test]
    fn test_self_pair_is_rejected() {
        assert_eq!(ConversationKey::new(5, 5), Err(SelfPairError));
    }

    #[test]
    fn test_other_returns_opposite_side() {
        let key = ConversationKey::new(1, 2).unwrap();
        assert_eq!(key.other(1), 2);
        assert_eq!(key.other(2), 1);
    }
}
