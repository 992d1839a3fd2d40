use serenity::{
    all::{CommandInteraction, CommandOptionType},
    builder::{CreateCommand, CreateCommandOption},
};

use crate::models::{
    command::{Command, CommandContext},
    giveaway::{MAX_DURATION_MINUTES, MIN_DURATION_MINUTES},
    handler::Handler,
    response::ResponseResult,
};

pub mod end;
pub mod interaction;
pub mod new;

pub struct GiveawayCommand;

#[async_trait::async_trait]
impl Command for GiveawayCommand {
    fn name(&self) -> &'static str {
        "giveaway"
    }

    fn register(&self) -> CreateCommand {
        CreateCommand::new("giveaway")
            .description("Start a giveaway")
            .add_option(
                CreateCommandOption::new(CommandOptionType::String, "prize", "What is the prize?")
                    .required(true),
            )
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::Integer,
                    "duration",
                    "Duration in minutes",
                )
                .min_int_value(MIN_DURATION_MINUTES as u64)
                .max_int_value(MAX_DURATION_MINUTES as u64)
                .required(true),
            )
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::String,
                    "winner",
                    "Rig the winner (user ID or mention)",
                )
                .required(false),
            )
            .dm_permission(false)
    }

    async fn router(
        &self,
        handler: &Handler,
        ctx: &CommandContext,
        cmd: &CommandInteraction,
    ) -> ResponseResult {
        new::new(handler, ctx, cmd).await
    }
}
