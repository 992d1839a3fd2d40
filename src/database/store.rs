use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard, PoisonError},
};

use serenity::all::{MessageId, RoleId, UserId};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::models::{
    giveaway::{Giveaway, GiveawayError, NewGiveaway},
    mercy::MercyError,
    state::BotState,
};

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("could not serialise bot state: {0}")]
    Serialise(#[from] serde_json::Error),
    #[error("could not write bot state: {0}")]
    Io(#[from] io::Error),
}

/// Owns the bot state and mirrors every change to a JSON file.
///
/// Each mutation runs under one lock together with its save, so two
/// interactions can never interleave a check with a write.
pub struct Store {
    path: PathBuf,
    state: Mutex<BotState>,
}

impl Store {
    /// Loads the state document at `path`. A missing, empty or unreadable
    /// document starts the bot from the default state.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut state = read_state(&path);
        state.normalise();

        info!(
            "Loaded bot state from {} with {} giveaways",
            path.display(),
            state.giveaways.len()
        );
        Store {
            path,
            state: Mutex::new(state),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the current state to disk. Failures are logged, never returned.
    pub fn save(&self) {
        let state = self.lock();
        self.persist(&state);
    }

    pub fn snapshot(&self) -> BotState {
        self.lock().clone()
    }

    pub fn start_giveaway(
        &self,
        new: NewGiveaway,
        now: time::OffsetDateTime,
    ) -> Result<Giveaway, GiveawayError> {
        self.mutate(|state| state.start_giveaway(new, unix_millis(now)))
    }

    pub fn attach_message(&self, giveaway_id: &str, message_id: MessageId) {
        let attached = self.mutate(|state| {
            if state.attach_message(giveaway_id, message_id) {
                Ok(())
            } else {
                Err(())
            }
        });
        if attached.is_err() {
            warn!("Could not attach message {message_id} to giveaway {giveaway_id}");
        }
    }

    pub fn enter_giveaway(&self, giveaway_id: &str, user_id: UserId) -> Result<usize, GiveawayError> {
        self.mutate(|state| state.enter_giveaway(giveaway_id, user_id))
    }

    pub fn end_giveaway(&self, giveaway_id: &str) -> Option<Giveaway> {
        self.mutate(|state| {
            state
                .end_giveaway(giveaway_id, &mut rand::thread_rng())
                .ok_or(())
        })
        .ok()
    }

    pub fn pending_giveaways(&self) -> Vec<Giveaway> {
        self.lock().pending_giveaways()
    }

    pub fn set_mercy_message(&self, message: String) -> Result<(), MercyError> {
        self.mutate(|state| state.set_mercy_message(message))
    }

    pub fn set_mercy_role(
        &self,
        role_id: RoleId,
        role_position: u16,
        bot_highest_position: u16,
    ) -> Result<(), MercyError> {
        self.mutate(|state| state.set_mercy_role(role_id, role_position, bot_highest_position))
    }

    pub fn mercy_role(&self) -> Result<RoleId, MercyError> {
        self.lock().mercy_role()
    }

    /// The configured mercy speech and role, failing if no role is set.
    pub fn mercy_speech(&self) -> Result<(String, RoleId), MercyError> {
        let state = self.lock();
        Ok((state.mercy_message.clone(), state.mercy_role()?))
    }

    fn lock(&self) -> MutexGuard<'_, BotState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn mutate<T, E>(&self, change: impl FnOnce(&mut BotState) -> Result<T, E>) -> Result<T, E> {
        let mut state = self.lock();
        let result = change(&mut state)?;
        self.persist(&state);
        Ok(result)
    }

    fn persist(&self, state: &BotState) {
        let start = std::time::Instant::now();
        if let Err(err) = write_state(&self.path, state) {
            error!(
                "Attempted to save bot state to {}, failed with error: {err}",
                self.path.display()
            );
            return;
        }
        debug!("Took {:?} to save bot state", start.elapsed());
    }
}

fn read_state(path: &Path) -> BotState {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            info!("No state found at {}, using defaults", path.display());
            return BotState::default();
        }
        Err(err) => {
            warn!(
                "Could not read state from {}, using defaults. Failed with error: {err}",
                path.display()
            );
            return BotState::default();
        }
    };

    if contents.trim().is_empty() {
        return BotState::default();
    }

    match serde_json::from_str(&contents) {
        Ok(state) => state,
        Err(err) => {
            warn!(
                "Could not parse state from {}, using defaults. Failed with error: {err}",
                path.display()
            );
            BotState::default()
        }
    }
}

/// Writes next to the target first and renames over it, so a crash mid-write
/// leaves the previous document intact.
fn write_state(path: &Path, state: &BotState) -> Result<(), PersistenceError> {
    let contents = serde_json::to_string_pretty(state)?;
    let mut temporary = path.as_os_str().to_owned();
    temporary.push(".tmp");
    let temporary = PathBuf::from(temporary);

    fs::write(&temporary, contents)?;
    fs::rename(&temporary, path)?;
    Ok(())
}

pub fn unix_millis(time: time::OffsetDateTime) -> i64 {
    i64::try_from(time.unix_timestamp_nanos() / 1_000_000).unwrap_or(i64::MAX)
}
