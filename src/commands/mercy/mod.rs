use serenity::{
    all::{ButtonStyle, CommandInteraction},
    builder::{CreateActionRow, CreateButton, CreateCommand, CreateEmbed},
};

use crate::models::{
    command::{Command, CommandContext, CommandContextReply},
    component::MERCY_ACCEPT,
    handler::Handler,
    response::{Response, ResponseResult},
};

pub mod accept;
pub mod role;
pub mod speech;

const MERCY_COLOR: i32 = 0x00ff00;

pub struct MercyCommand;

#[async_trait::async_trait]
impl Command for MercyCommand {
    fn name(&self) -> &'static str {
        "mercy"
    }

    fn register(&self) -> CreateCommand {
        CreateCommand::new("mercy")
            .description("Send the mercy speech with clickable button")
            .dm_permission(false)
    }

    async fn router(
        &self,
        handler: &Handler,
        ctx: &CommandContext,
        cmd: &CommandInteraction,
    ) -> ResponseResult {
        let (speech, _) = handler.store.mercy_speech()?;

        ctx.reply(
            cmd,
            Response::new()
                .embed(
                    CreateEmbed::new()
                        .title("Mercy")
                        .description(speech)
                        .color(MERCY_COLOR),
                )
                .components(vec![CreateActionRow::Buttons(vec![CreateButton::new(
                    MERCY_ACCEPT,
                )
                .label("Accept")
                .emoji('✅')
                .style(ButtonStyle::Success)])]),
        )
        .await
    }
}
