use std::{sync::Arc, time::Duration};

use serenity::{
    all::{ButtonStyle, Http, Timestamp},
    builder::{CreateActionRow, CreateButton, CreateEmbed, EditMessage},
};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::{
    database::store::{unix_millis, Store},
    models::{
        component::giveaway_custom_id,
        giveaway::{Giveaway, GiveawayError, NewGiveaway},
    },
};

const ENDED_COLOR: i32 = 0xff0000;

/// The platform calls made when a giveaway closes.
#[async_trait::async_trait]
pub trait GiveawayAnnouncer: Send + Sync {
    async fn edit_announcement(
        &self,
        giveaway: &Giveaway,
        embed: CreateEmbed,
        button: CreateButton,
    ) -> Result<(), serenity::Error>;

    async fn post_result(&self, giveaway: &Giveaway, content: String)
        -> Result<(), serenity::Error>;
}

#[async_trait::async_trait]
impl GiveawayAnnouncer for Http {
    async fn edit_announcement(
        &self,
        giveaway: &Giveaway,
        embed: CreateEmbed,
        button: CreateButton,
    ) -> Result<(), serenity::Error> {
        let Some(message_id) = giveaway.message_id else {
            return Err(serenity::Error::Other("giveaway has no announcement message"));
        };

        giveaway
            .channel_id
            .edit_message(
                self,
                message_id,
                EditMessage::new()
                    .embed(embed)
                    .components(vec![CreateActionRow::Buttons(vec![button])]),
            )
            .await?;
        Ok(())
    }

    async fn post_result(
        &self,
        giveaway: &Giveaway,
        content: String,
    ) -> Result<(), serenity::Error> {
        giveaway.channel_id.say(self, content).await?;
        Ok(())
    }
}

fn ended_embed(giveaway: &Giveaway) -> CreateEmbed {
    let result = match &giveaway.winner {
        Some(winner) => format!("**Winner:** <@{winner}>"),
        None => "No participants, no winner!".to_string(),
    };

    CreateEmbed::new()
        .title("🎉 GIVEAWAY ENDED 🎉")
        .description(format!("**Prize:** {}\n\n{result}", giveaway.prize))
        .color(ENDED_COLOR)
        .timestamp(Timestamp::now())
}

pub fn ended_button(giveaway_id: &str) -> CreateButton {
    CreateButton::new(giveaway_custom_id(giveaway_id))
        .label("Giveaway Ended")
        .emoji('🎉')
        .style(ButtonStyle::Secondary)
        .disabled(true)
}

fn result_message(giveaway: &Giveaway) -> String {
    match &giveaway.winner {
        Some(winner) => format!(
            "🎉 Congratulations <@{winner}>! You won **{}**!",
            giveaway.prize
        ),
        None => format!(
            "Nobody entered the **{}** giveaway, so there is no winner.",
            giveaway.prize
        ),
    }
}

/// Closes a giveaway and announces the result. Only the first call for a
/// giveaway does anything; later calls return `None`.
///
/// The giveaway stays ended even if the announcement can no longer be
/// edited (message or channel deleted).
pub async fn end_giveaway(
    store: &Store,
    announcer: &dyn GiveawayAnnouncer,
    giveaway_id: &str,
) -> Option<Giveaway> {
    let Some(giveaway) = store.end_giveaway(giveaway_id) else {
        debug!("Giveaway {giveaway_id} is unknown or already ended");
        return None;
    };
    info!(
        "Ended giveaway {} with {} entries, winner: {:?}",
        giveaway.id,
        giveaway.participants.len(),
        giveaway.winner
    );

    if let Err(err) = announcer
        .edit_announcement(&giveaway, ended_embed(&giveaway), ended_button(&giveaway.id))
        .await
    {
        error!(
            "Could not update giveaway message to end giveaway {}. Failed with error: {:?}",
            giveaway.id, err
        );
        return Some(giveaway);
    }

    if let Err(err) = announcer
        .post_result(&giveaway, result_message(&giveaway))
        .await
    {
        error!(
            "Could not send giveaway result message for giveaway {}. Failed with error: {:?}",
            giveaway.id, err
        );
    }

    Some(giveaway)
}

/// Ends the giveaway after `delay`. The timer lives only in this process and
/// is not cancelled by anything.
pub fn schedule_end(
    store: Arc<Store>,
    announcer: Arc<dyn GiveawayAnnouncer>,
    giveaway_id: String,
    delay: Duration,
) -> JoinHandle<Option<Giveaway>> {
    debug!("Giveaway {giveaway_id} will end in {delay:?}");
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        end_giveaway(&store, announcer.as_ref(), &giveaway_id).await
    })
}

/// Records a new giveaway and arms its close straight away, before anything
/// is posted. A giveaway whose announcement never goes out still ends.
pub fn open_giveaway(
    store: &Arc<Store>,
    announcer: Arc<dyn GiveawayAnnouncer>,
    new: NewGiveaway,
    now: time::OffsetDateTime,
) -> Result<Giveaway, GiveawayError> {
    let giveaway = store.start_giveaway(new, now)?;
    schedule_end(
        store.clone(),
        announcer,
        giveaway.id.clone(),
        Duration::from_millis(giveaway.remaining_ms(unix_millis(now))),
    );
    Ok(giveaway)
}

/// Re-arms the timers of every giveaway that had not ended when the bot last
/// stopped. Overdue giveaways end straight away.
pub fn resume_giveaways(
    store: &Arc<Store>,
    announcer: &Arc<dyn GiveawayAnnouncer>,
    now: time::OffsetDateTime,
) -> Vec<JoinHandle<Option<Giveaway>>> {
    let now_ms = unix_millis(now);
    let pending = store.pending_giveaways();
    info!("Resuming {} unfinished giveaways", pending.len());

    pending
        .into_iter()
        .map(|giveaway| {
            schedule_end(
                store.clone(),
                announcer.clone(),
                giveaway.id.clone(),
                Duration::from_millis(giveaway.remaining_ms(now_ms)),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serenity::all::{MessageId, UserId};

    use super::*;
    use crate::database::store::tests::{new_giveaway, temp_state_path};

    #[derive(Default)]
    struct FakeAnnouncer {
        fail_edits: bool,
        require_message: bool,
        edits: Mutex<Vec<(String, bool)>>,
        posts: Mutex<Vec<String>>,
    }

    #[async_trait::async_trait]
    impl GiveawayAnnouncer for FakeAnnouncer {
        async fn edit_announcement(
            &self,
            giveaway: &Giveaway,
            _embed: CreateEmbed,
            button: CreateButton,
        ) -> Result<(), serenity::Error> {
            if self.fail_edits {
                return Err(serenity::Error::Other("Unknown Message"));
            }
            if self.require_message && giveaway.message_id.is_none() {
                return Err(serenity::Error::Other("giveaway has no announcement message"));
            }
            let disabled = serde_json::to_value(&button)
                .ok()
                .and_then(|button| button.get("disabled").and_then(serde_json::Value::as_bool))
                .unwrap_or(false);
            self.edits
                .lock()
                .unwrap()
                .push((giveaway.id.clone(), disabled));
            Ok(())
        }

        async fn post_result(
            &self,
            _giveaway: &Giveaway,
            content: String,
        ) -> Result<(), serenity::Error> {
            self.posts.lock().unwrap().push(content);
            Ok(())
        }
    }

    fn minutes(count: u64) -> Duration {
        Duration::from_secs(count * 60)
    }

    #[tokio::test(start_paused = true)]
    async fn gift_card_closes_after_a_minute_with_one_winner() {
        let path = temp_state_path("gift-card");
        let store = Arc::new(Store::load(&path));
        let announcer = Arc::new(FakeAnnouncer::default());
        let giveaway = store
            .start_giveaway(new_giveaway("Gift Card", 1, None), time::OffsetDateTime::now_utc())
            .unwrap();
        let handle = schedule_end(
            store.clone(),
            announcer.clone(),
            giveaway.id.clone(),
            minutes(1),
        );

        for user in [11, 22, 33] {
            store.enter_giveaway(&giveaway.id, UserId::new(user)).unwrap();
        }
        tokio::time::sleep(Duration::from_secs(59)).await;
        assert!(!store.snapshot().giveaways[&giveaway.id].ended);

        let ended = handle.await.unwrap().unwrap();
        let winner = ended.winner.unwrap();
        assert!(["11", "22", "33"].contains(&winner.as_str()));

        let posts = announcer.posts.lock().unwrap();
        assert_eq!(posts.len(), 1);
        assert!(posts[0].contains(&format!("<@{winner}>")));
        assert!(posts[0].contains("Gift Card"));
        assert_eq!(
            *announcer.edits.lock().unwrap(),
            vec![(giveaway.id.clone(), true)]
        );
        assert!(store.snapshot().giveaways[&giveaway.id].ended);
    }

    #[tokio::test(start_paused = true)]
    async fn rigged_prize_goes_to_the_rigged_winner_without_entrants() {
        let path = temp_state_path("rigged-prize");
        let store = Arc::new(Store::load(&path));
        let announcer = Arc::new(FakeAnnouncer::default());
        let giveaway = store
            .start_giveaway(
                new_giveaway("Rigged Prize", 5, Some("<@12345>")),
                time::OffsetDateTime::now_utc(),
            )
            .unwrap();

        let ended = schedule_end(store.clone(), announcer.clone(), giveaway.id, minutes(5))
            .await
            .unwrap()
            .unwrap();

        assert!(ended.participants.is_empty());
        assert_eq!(ended.winner.as_deref(), Some("12345"));
        assert!(announcer.posts.lock().unwrap()[0].contains("<@12345>"));
    }

    #[tokio::test]
    async fn ending_twice_announces_once() {
        let path = temp_state_path("end-twice");
        let store = Store::load(&path);
        let announcer = FakeAnnouncer::default();
        let giveaway = store
            .start_giveaway(new_giveaway("Sticker", 1, None), time::OffsetDateTime::now_utc())
            .unwrap();
        store.enter_giveaway(&giveaway.id, UserId::new(5)).unwrap();

        let first = end_giveaway(&store, &announcer, &giveaway.id).await;
        let second = end_giveaway(&store, &announcer, &giveaway.id).await;

        assert_eq!(first.and_then(|giveaway| giveaway.winner).as_deref(), Some("5"));
        assert!(second.is_none());
        assert_eq!(announcer.posts.lock().unwrap().len(), 1);
        assert_eq!(announcer.edits.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn no_entrants_posts_a_notice() {
        let path = temp_state_path("no-entrants");
        let store = Store::load(&path);
        let announcer = FakeAnnouncer::default();
        let giveaway = store
            .start_giveaway(new_giveaway("Mug", 1, None), time::OffsetDateTime::now_utc())
            .unwrap();

        let ended = end_giveaway(&store, &announcer, &giveaway.id).await.unwrap();

        assert_eq!(ended.winner, None);
        let posts = announcer.posts.lock().unwrap();
        assert_eq!(posts.len(), 1);
        assert!(posts[0].contains("no winner"));
        assert!(!posts[0].contains("<@"));
    }

    #[tokio::test]
    async fn vanished_announcements_still_end_the_giveaway() {
        let path = temp_state_path("vanished");
        let store = Store::load(&path);
        let announcer = FakeAnnouncer {
            fail_edits: true,
            ..FakeAnnouncer::default()
        };
        let giveaway = store
            .start_giveaway(new_giveaway("Hoodie", 1, None), time::OffsetDateTime::now_utc())
            .unwrap();

        assert!(end_giveaway(&store, &announcer, &giveaway.id).await.is_some());
        assert!(store.snapshot().giveaways[&giveaway.id].ended);
        assert!(announcer.posts.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn unannounced_giveaways_still_end() {
        let path = temp_state_path("unannounced");
        let store = Arc::new(Store::load(&path));
        let announcer = Arc::new(FakeAnnouncer {
            require_message: true,
            ..FakeAnnouncer::default()
        });

        let giveaway = open_giveaway(
            &store,
            announcer.clone(),
            new_giveaway("Keyboard", 2, None),
            time::OffsetDateTime::now_utc(),
        )
        .unwrap();
        assert_eq!(giveaway.message_id, None);

        tokio::time::sleep(minutes(1)).await;
        assert!(!store.snapshot().giveaways[&giveaway.id].ended);

        tokio::time::sleep(minutes(1) + Duration::from_secs(1)).await;
        assert!(store.snapshot().giveaways[&giveaway.id].ended);
        assert!(announcer.edits.lock().unwrap().is_empty());
        assert!(announcer.posts.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn opened_giveaways_are_armed_once() {
        let path = temp_state_path("opened");
        let store = Arc::new(Store::load(&path));
        let announcer = Arc::new(FakeAnnouncer::default());

        let giveaway = open_giveaway(
            &store,
            announcer.clone(),
            new_giveaway("Poster", 1, None),
            time::OffsetDateTime::now_utc(),
        )
        .unwrap();
        store.attach_message(&giveaway.id, MessageId::new(90));
        store.enter_giveaway(&giveaway.id, UserId::new(4)).unwrap();

        tokio::time::sleep(minutes(3)).await;
        assert_eq!(store.snapshot().giveaways[&giveaway.id].winner.as_deref(), Some("4"));
        assert_eq!(announcer.posts.lock().unwrap().len(), 1);
    }

    #[test]
    fn invalid_durations_arm_nothing() {
        let path = temp_state_path("open-invalid");
        let store = Arc::new(Store::load(&path));
        let announcer: Arc<dyn GiveawayAnnouncer> = Arc::new(FakeAnnouncer::default());

        assert_eq!(
            open_giveaway(
                &store,
                announcer,
                new_giveaway("Nothing", 0, None),
                time::OffsetDateTime::now_utc(),
            ),
            Err(GiveawayError::InvalidDuration(0))
        );
        assert!(store.pending_giveaways().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn resumed_giveaways_end_on_time() {
        let path = temp_state_path("resume");
        let store = Arc::new(Store::load(&path));
        let now = time::OffsetDateTime::now_utc();
        let overdue = store
            .start_giveaway(new_giveaway("Old", 1, None), now - time::Duration::minutes(10))
            .unwrap();
        let upcoming = store
            .start_giveaway(new_giveaway("New", 10, None), now)
            .unwrap();
        let already_ended = store
            .start_giveaway(new_giveaway("Done", 1, None), now)
            .unwrap();
        store.end_giveaway(&already_ended.id);

        let announcer: Arc<dyn GiveawayAnnouncer> = Arc::new(FakeAnnouncer::default());
        let handles = resume_giveaways(&store, &announcer, now);
        assert_eq!(handles.len(), 2);

        tokio::time::sleep(Duration::from_secs(1)).await;
        let state = store.snapshot();
        assert!(state.giveaways[&overdue.id].ended);
        assert!(!state.giveaways[&upcoming.id].ended);

        tokio::time::sleep(minutes(10)).await;
        assert!(store.snapshot().giveaways[&upcoming.id].ended);
    }

    #[test]
    fn ended_button_is_disabled() {
        let button = serde_json::to_value(ended_button("77")).unwrap();
        assert_eq!(button["disabled"], serde_json::Value::Bool(true));
        assert_eq!(button["custom_id"], "giveaway_77");
    }
}
