use rand::{seq::SliceRandom, Rng};
use serde_derive::{Deserialize, Serialize};
use serenity::all::{ChannelId, GuildId, MessageId, UserId};
use thiserror::Error;

use crate::common::mention::strip_mention;

pub const MIN_DURATION_MINUTES: i64 = 1;
pub const MAX_DURATION_MINUTES: i64 = 10080;

const MILLIS_PER_MINUTE: i64 = 60_000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GiveawayError {
    #[error("This giveaway has ended!")]
    AlreadyEnded,
    #[error("You are already entered in this giveaway!")]
    DuplicateEntry,
    #[error("Giveaways must last between 1 and 10080 minutes, got {0}")]
    InvalidDuration(i64),
}

/// A giveaway as stored in the state document.
///
/// `end_time` is kept in epoch milliseconds so the document stays readable
/// by anything that wrote it before.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Giveaway {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub message_id: Option<MessageId>,
    pub channel_id: ChannelId,
    #[serde(default)]
    pub guild_id: Option<GuildId>,
    pub prize: String,
    pub duration: i64,
    #[serde(default)]
    pub rigged_winner: Option<String>,
    #[serde(default)]
    pub participants: Vec<UserId>,
    pub end_time: i64,
    #[serde(default)]
    pub ended: bool,
    #[serde(default)]
    pub winner: Option<String>,
}

pub struct NewGiveaway {
    pub prize: String,
    pub duration: i64,
    pub rigged_winner: Option<String>,
    pub channel_id: ChannelId,
    pub guild_id: Option<GuildId>,
}

impl Giveaway {
    pub fn new(id: String, new: NewGiveaway, now_ms: i64) -> Result<Self, GiveawayError> {
        if !(MIN_DURATION_MINUTES..=MAX_DURATION_MINUTES).contains(&new.duration) {
            return Err(GiveawayError::InvalidDuration(new.duration));
        }

        Ok(Giveaway {
            id,
            message_id: None,
            channel_id: new.channel_id,
            guild_id: new.guild_id,
            prize: new.prize,
            duration: new.duration,
            rigged_winner: new.rigged_winner.filter(|winner| !winner.is_empty()),
            participants: vec![],
            end_time: now_ms + new.duration * MILLIS_PER_MINUTE,
            ended: false,
            winner: None,
        })
    }

    pub fn enter(&mut self, user_id: UserId) -> Result<usize, GiveawayError> {
        if self.ended {
            return Err(GiveawayError::AlreadyEnded);
        }
        if self.participants.contains(&user_id) {
            return Err(GiveawayError::DuplicateEntry);
        }

        self.participants.push(user_id);
        Ok(self.participants.len())
    }

    /// Picks the winner: the rigged winner if one was given, otherwise a
    /// uniformly random participant.
    pub fn draw_winner<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<String> {
        if let Some(rigged) = &self.rigged_winner {
            let winner = strip_mention(rigged);
            return if winner.is_empty() { None } else { Some(winner) };
        }

        self.participants
            .choose(rng)
            .map(|user_id| user_id.get().to_string())
    }

    /// Marks the giveaway as ended and records the winner. Returns `false`
    /// if it had already ended, in which case nothing changes.
    pub fn end<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        if self.ended {
            return false;
        }

        self.winner = self.draw_winner(rng);
        self.ended = true;
        true
    }

    pub fn remaining_ms(&self, now_ms: i64) -> u64 {
        u64::try_from(self.end_time - now_ms).unwrap_or(0)
    }
}
