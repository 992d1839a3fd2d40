use serenity::{
    all::{CommandInteraction, CommandOptionType},
    builder::{CreateCommand, CreateCommandOption, CreateEmbed},
};
use tracing::info;

use crate::{
    common::options::Options,
    models::{
        command::{Command, CommandContext, CommandContextReply},
        handler::Handler,
        mercy::MAX_MERCY_MESSAGE_LENGTH,
        response::{Response, ResponseError, ResponseResult},
    },
};

pub struct MercySpeechCommand;

#[async_trait::async_trait]
impl Command for MercySpeechCommand {
    fn name(&self) -> &'static str {
        "mercyspeech"
    }

    fn register(&self) -> CreateCommand {
        CreateCommand::new("mercyspeech")
            .description("Set the mercy speech message")
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::String,
                    "message",
                    "The mercy speech text",
                )
                .max_length(MAX_MERCY_MESSAGE_LENGTH as u16)
                .required(true),
            )
            .dm_permission(false)
    }

    async fn router(
        &self,
        handler: &Handler,
        ctx: &CommandContext,
        cmd: &CommandInteraction,
    ) -> ResponseResult {
        let options = Options {
            options: cmd.data.options(),
        };

        let Some(message) = options.get_string("message") else {
            return Err(ResponseError::Execution(
                "Could not get mercy speech",
                Some("Please provide the text of the mercy speech".to_string()),
            ));
        };

        handler.store.set_mercy_message(message.clone())?;
        info!("Mercy speech updated by {}", cmd.user.id);

        ctx.reply(
            cmd,
            Response::new()
                .embed(
                    CreateEmbed::new()
                        .title("Mercy speech updated")
                        .description(message),
                )
                .ephemeral(true),
        )
        .await
    }
}
