use serenity::{
    all::{CommandInteraction, CommandOptionType},
    builder::{CreateCommand, CreateCommandOption},
};
use tracing::{debug, info};

use crate::{
    common::options::Options,
    models::{
        command::{Command, CommandContext, CommandContextReply},
        handler::Handler,
        highest_role::get_highest_role,
        response::{Response, ResponseError, ResponseResult},
    },
};

pub struct MercyRoleCommand;

#[async_trait::async_trait]
impl Command for MercyRoleCommand {
    fn name(&self) -> &'static str {
        "mercyrole"
    }

    fn register(&self) -> CreateCommand {
        CreateCommand::new("mercyrole")
            .description("Set the role given when mercy button is clicked")
            .add_option(
                CreateCommandOption::new(CommandOptionType::Role, "role", "The role to assign")
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

        let Some(role) = options.get_role("role") else {
            return Err(ResponseError::Execution(
                "Could not get role",
                Some("Please provide the role to give out".to_string()),
            ));
        };

        let bot_id = ctx.ctx.cache.current_user().id;
        let bot_highest = get_highest_role(ctx, bot_id).await;
        debug!(
            "Role {} sits at {}, my highest role sits at {}",
            role.id, role.position, bot_highest
        );

        handler
            .store
            .set_mercy_role(role.id, role.position, bot_highest)?;
        info!("Mercy role set to {} in guild {}", role.id, ctx.guild.id);

        ctx.reply(
            cmd,
            Response::new()
                .content(format!("Mercy role set to: {}", role.name))
                .ephemeral(true),
        )
        .await
    }
}
