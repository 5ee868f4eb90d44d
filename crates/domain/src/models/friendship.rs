//! Friendship domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

/// Friendship between a requester and an addressee.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Friendship {
    pub id: i64,
    pub requester_id: i64,
    pub addressee_id: i64,
    pub status: FriendshipStatus,
    pub created_at: DateTime<Utc>,
}

impl Friendship {
    /// The user on the other side of the friendship, if `user_id` is a party.
    pub fn other_party(&self, user_id: i64) -> Option<i64> {
        if self.requester_id == user_id {
            Some(self.addressee_id)
        } else if self.addressee_id == user_id {
            Some(self.requester_id)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FriendshipStatus {
    Pending,
    Accepted,
    Declined,
    Blocked,
}

impl FriendshipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FriendshipStatus::Pending => "pending",
            FriendshipStatus::Accepted => "accepted",
            FriendshipStatus::Declined => "declined",
            FriendshipStatus::Blocked => "blocked",
        }
    }
}

impl FromStr for FriendshipStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(FriendshipStatus::Pending),
            "accepted" => Ok(FriendshipStatus::Accepted),
            "declined" => Ok(FriendshipStatus::Declined),
            "blocked" => Ok(FriendshipStatus::Blocked),
            _ => Err(format!("Invalid friendship status: {}", s)),
        }
    }
}

impl fmt::Display for FriendshipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFriendshipRequest {
    pub requester_id: i64,
    pub addressee_id: i64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateFriendshipRequest {
    pub status: FriendshipStatus,
}
