use std::sync::atomic::AtomicBool;

use serenity::{
    all::{CommandInteraction, ComponentInteraction, Message, PartialGuild},
    builder::CreateCommand,
    prelude::Context as IncomingContext,
};

use super::{
    handler::Handler,
    response::{Response, ResponseError, ResponseResult},
};

pub struct CommandContext {
    pub ctx: IncomingContext,
    pub has_responsed: AtomicBool,
    pub guild: PartialGuild,
}

pub struct FailedCommandContext {
    pub ctx: IncomingContext,
}

pub struct InteractionContext<'a> {
    pub ctx: IncomingContext,
    pub interaction: &'a ComponentInteraction,
    pub has_responsed: AtomicBool,
}

impl<'a> InteractionContext<'a> {
    pub fn new(ctx: IncomingContext, interaction: &'a ComponentInteraction) -> Self {
        InteractionContext {
            ctx,
            interaction,
            has_responsed: AtomicBool::new(false),
        }
    }
}

#[async_trait::async_trait]
pub trait CommandContextReply {
    async fn reply_get_message(
        &self,
        cmd: &CommandInteraction,
        response: Response,
    ) -> Result<Message, ResponseError>;

    async fn reply(&self, cmd: &CommandInteraction, response: Response) -> ResponseResult;

    async fn error_message(&self, cmd: &CommandInteraction, error: &ResponseError) -> ResponseResult {
        self.reply(cmd, Response::error(error)).await
    }
}

#[async_trait::async_trait]
pub trait InteractionContextReply {
    async fn reply(&self, response: Response) -> ResponseResult;

    async fn error_message(&self, error: &ResponseError) -> ResponseResult {
        self.reply(Response::error(error)).await
    }
}

#[async_trait::async_trait]
pub trait Command: Send + Sync {
    fn name(&self) -> &'static str;
    fn register(&self) -> CreateCommand;
    async fn router(
        &self,
        handler: &Handler,
        ctx: &CommandContext,
        cmd: &CommandInteraction,
    ) -> ResponseResult;
}
