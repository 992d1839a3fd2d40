use std::{sync::Arc, time::Duration};

use serenity::{
    all::{ButtonStyle, CommandInteraction, Timestamp},
    builder::{CreateActionRow, CreateButton, CreateEmbed, CreateEmbedFooter},
};
use tracing::info;

use crate::{
    common::options::Options,
    models::{
        command::{CommandContext, CommandContextReply},
        component::giveaway_custom_id,
        giveaway::{Giveaway, NewGiveaway},
        handler::Handler,
        response::{Response, ResponseError, ResponseResult},
    },
};

use super::end::{open_giveaway, GiveawayAnnouncer};

const GIVEAWAY_COLOR: i32 = 0xffd700;

fn duration_of(giveaway: &Giveaway) -> Duration {
    Duration::from_secs(u64::try_from(giveaway.duration).unwrap_or(0) * 60)
}

fn generate_embed(giveaway: &Giveaway) -> CreateEmbed {
    let embed = CreateEmbed::new()
        .title("🎉 GIVEAWAY 🎉")
        .description(format!(
            "**Prize:** {}\n**Duration:** {}\n\nGiveaway ends <t:{}:R>\n\nClick the 🎉 button below to enter!",
            giveaway.prize,
            pretty_duration::pretty_duration(&duration_of(giveaway), None),
            giveaway.end_time / 1000
        ))
        .color(GIVEAWAY_COLOR)
        .footer(CreateEmbedFooter::new("Ends at"));

    match Timestamp::from_unix_timestamp(giveaway.end_time / 1000) {
        Ok(end) => embed.timestamp(end),
        Err(_) => embed,
    }
}

pub fn entry_button(giveaway_id: &str) -> CreateButton {
    CreateButton::new(giveaway_custom_id(giveaway_id))
        .label("Enter Giveaway")
        .emoji('🎉')
        .style(ButtonStyle::Primary)
}

pub async fn new(handler: &Handler, ctx: &CommandContext, cmd: &CommandInteraction) -> ResponseResult {
    let options = Options {
        options: cmd.data.options(),
    };

    let Some(prize) = options.get_string("prize") else {
        return Err(ResponseError::Execution(
            "Could not get giveaway prize",
            Some("Please provide a prize for the giveaway".to_string()),
        ));
    };

    let Some(duration) = options.get_integer("duration") else {
        return Err(ResponseError::Execution(
            "Could not get giveaway duration",
            Some("Please provide the giveaway duration in minutes".to_string()),
        ));
    };

    let announcer: Arc<dyn GiveawayAnnouncer> = ctx.ctx.http.clone();
    let giveaway = open_giveaway(
        &handler.store,
        announcer,
        NewGiveaway {
            prize,
            duration,
            rigged_winner: options.get_string("winner"),
            channel_id: cmd.channel_id,
            guild_id: cmd.guild_id,
        },
        time::OffsetDateTime::now_utc(),
    )?;

    let message = ctx
        .reply_get_message(
            cmd,
            Response::new()
                .embed(generate_embed(&giveaway))
                .components(vec![CreateActionRow::Buttons(vec![entry_button(
                    &giveaway.id,
                )])]),
        )
        .await?;
    handler.store.attach_message(&giveaway.id, message.id);

    info!(
        "Started giveaway {} for {} in channel {}, ending in {} minutes",
        giveaway.id, giveaway.prize, giveaway.channel_id, giveaway.duration
    );

    Ok(())
}
