use std::sync::atomic::AtomicBool;

use serenity::{
    all::{CommandInteraction, PartialGuild},
    prelude::Context as IncomingContext,
};
use tracing::{debug, error};

use crate::{
    commands::get_command_list,
    models::{
        command::{CommandContext, CommandContextReply, FailedCommandContext},
        handler::Handler,
        response::{Response, ResponseError},
    },
};

impl Handler {
    pub async fn on_command(&self, ctx: IncomingContext, command: CommandInteraction) {
        let start = std::time::Instant::now();

        let Some(guild_id) = command.guild_id else {
            let fail_context = FailedCommandContext { ctx };
            if let Err(err) = fail_context
                .reply(
                    &command,
                    Response::new()
                        .content("This bot cannot be used outside of servers".to_string())
                        .ephemeral(true),
                )
                .await
            {
                error!("Failed to reply to command: {:?}", err);
            }
            return;
        };

        let cached_guild = guild_id
            .to_guild_cached(&ctx.cache)
            .map(|guild| PartialGuild::from(guild.clone()));
        let guild = match cached_guild {
            Some(guild) => guild,
            None => match guild_id.to_partial_guild(&ctx.http).await {
                Ok(guild) => guild,
                Err(err) => {
                    error!("Could not obtain guild {guild_id}. Failed with error: {err}");
                    let fail_context = FailedCommandContext { ctx };
                    if let Err(err) = fail_context
                        .error_message(&command, &ResponseError::Serenity(err))
                        .await
                    {
                        error!("Failed to reply to command: {:?}", err);
                    }
                    return;
                }
            },
        };

        debug!("Took {:?} to get guild ID and guild", start.elapsed());

        let command_context = CommandContext {
            ctx,
            has_responsed: AtomicBool::new(false),
            guild,
        };

        let result = match get_command_list()
            .into_iter()
            .find(|existing_command| existing_command.name() == command.data.name)
        {
            Some(existing_command) => {
                existing_command
                    .router(self, &command_context, &command)
                    .await
            }
            None => Err(ResponseError::UnknownCommand(command.data.name.clone())),
        };

        if let Err(err) = result {
            error!("Failed to handle command {}: {:?}", command.data.name, err);
            if let Err(err) = command_context.error_message(&command, &err).await {
                error!("Failed to report command failure: {:?}", err);
            }
        }

        debug!("Took {:?} to handle a command", start.elapsed());
    }
}
