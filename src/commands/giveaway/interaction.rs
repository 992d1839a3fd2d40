use serenity::builder::CreateEmbed;
use tracing::debug;

use crate::models::{
    command::{InteractionContext, InteractionContextReply},
    handler::Handler,
    response::{Response, ResponseResult},
};

const ENTERED_COLOR: i32 = 0x00ff00;

pub async fn enter(
    handler: &Handler,
    ctx: &InteractionContext<'_>,
    giveaway_id: &str,
) -> ResponseResult {
    let user_id = ctx.interaction.user.id;
    let entries = handler.store.enter_giveaway(giveaway_id, user_id)?;
    debug!("User {user_id} entered giveaway {giveaway_id} ({entries} entries)");

    ctx.reply(
        Response::new()
            .embed(
                CreateEmbed::new()
                    .title("You're in the running!")
                    .description("You have entered the giveaway! Good luck! 🍀")
                    .color(ENTERED_COLOR),
            )
            .ephemeral(true),
    )
    .await
}
