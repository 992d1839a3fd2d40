use std::collections::BTreeMap;

use rand::Rng;
use serde_derive::{Deserialize, Serialize};
use serenity::all::{MessageId, RoleId, UserId};

use super::{
    giveaway::{Giveaway, GiveawayError, NewGiveaway},
    mercy::{MercyError, DEFAULT_MERCY_MESSAGE, MAX_MERCY_MESSAGE_LENGTH},
};

fn default_mercy_message() -> String {
    DEFAULT_MERCY_MESSAGE.to_string()
}

/// Everything the bot remembers between restarts. Written to disk as a
/// single JSON document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotState {
    #[serde(default = "default_mercy_message")]
    pub mercy_message: String,
    #[serde(default)]
    pub mercy_role_id: Option<RoleId>,
    #[serde(default)]
    pub giveaways: BTreeMap<String, Giveaway>,
}

impl Default for BotState {
    fn default() -> Self {
        BotState {
            mercy_message: default_mercy_message(),
            mercy_role_id: None,
            giveaways: BTreeMap::new(),
        }
    }
}

impl BotState {
    /// Older documents keyed giveaways without repeating the ID inside the
    /// record, so fill it in from the key.
    pub fn normalise(&mut self) {
        for (id, giveaway) in &mut self.giveaways {
            if giveaway.id.is_empty() {
                giveaway.id.clone_from(id);
            }
        }
    }

    pub fn start_giveaway(
        &mut self,
        new: NewGiveaway,
        now_ms: i64,
    ) -> Result<Giveaway, GiveawayError> {
        let mut id = now_ms;
        while self.giveaways.contains_key(&id.to_string()) {
            id += 1;
        }

        let giveaway = Giveaway::new(id.to_string(), new, now_ms)?;
        self.giveaways
            .insert(giveaway.id.clone(), giveaway.clone());
        Ok(giveaway)
    }

    pub fn attach_message(&mut self, giveaway_id: &str, message_id: MessageId) -> bool {
        match self.giveaways.get_mut(giveaway_id) {
            Some(giveaway) if !giveaway.ended => {
                giveaway.message_id = Some(message_id);
                true
            }
            _ => false,
        }
    }

    pub fn enter_giveaway(
        &mut self,
        giveaway_id: &str,
        user_id: UserId,
    ) -> Result<usize, GiveawayError> {
        self.giveaways
            .get_mut(giveaway_id)
            .ok_or(GiveawayError::AlreadyEnded)?
            .enter(user_id)
    }

    /// Ends a giveaway, returning a snapshot of the ended record. `None` if
    /// the giveaway is unknown or was already ended.
    pub fn end_giveaway<R: Rng + ?Sized>(
        &mut self,
        giveaway_id: &str,
        rng: &mut R,
    ) -> Option<Giveaway> {
        let giveaway = self.giveaways.get_mut(giveaway_id)?;
        if giveaway.end(rng) {
            Some(giveaway.clone())
        } else {
            None
        }
    }

    pub fn pending_giveaways(&self) -> Vec<Giveaway> {
        self.giveaways
            .values()
            .filter(|giveaway| !giveaway.ended)
            .cloned()
            .collect()
    }

    pub fn set_mercy_message(&mut self, message: String) -> Result<(), MercyError> {
        if message.chars().count() > MAX_MERCY_MESSAGE_LENGTH {
            return Err(MercyError::MessageTooLong);
        }

        self.mercy_message = message;
        Ok(())
    }

    /// Roles can only be handed out by the bot if they sit strictly below
    /// its own highest role.
    pub fn set_mercy_role(
        &mut self,
        role_id: RoleId,
        role_position: u16,
        bot_highest_position: u16,
    ) -> Result<(), MercyError> {
        if role_position >= bot_highest_position {
            return Err(MercyError::RoleNotAssignable);
        }

        self.mercy_role_id = Some(role_id);
        Ok(())
    }

    pub fn mercy_role(&self) -> Result<RoleId, MercyError> {
        self.mercy_role_id.ok_or(MercyError::NoRoleConfigured)
    }
}
