use serenity::builder::{CreateActionRow, CreateAllowedMentions, CreateEmbed};

use super::{giveaway::GiveawayError, mercy::MercyError};

const ERROR_COLOR: i32 = 0xff0000;

pub struct Response {
    pub content: Option<String>,
    pub embeds: Option<Vec<CreateEmbed>>,
    pub allowed_mentions: Option<CreateAllowedMentions>,
    pub components: Option<Vec<CreateActionRow>>,
    pub ephemeral: bool,
}

#[derive(Debug)]
pub enum ResponseError {
    Serenity(serenity::Error),
    Execution(&'static str, Option<String>),
    UnknownCommand(String),
}

pub type ResponseResult = Result<(), ResponseError>;

impl From<serenity::Error> for ResponseError {
    fn from(value: serenity::Error) -> Self {
        ResponseError::Serenity(value)
    }
}

impl From<GiveawayError> for ResponseError {
    fn from(value: GiveawayError) -> Self {
        let title = match value {
            GiveawayError::InvalidDuration(_) => "Could not start giveaway",
            GiveawayError::AlreadyEnded | GiveawayError::DuplicateEntry => {
                "Could not enter giveaway"
            }
        };
        ResponseError::Execution(title, Some(value.to_string()))
    }
}

impl From<MercyError> for ResponseError {
    fn from(value: MercyError) -> Self {
        let title = match value {
            MercyError::NoRoleConfigured => "No mercy role",
            MercyError::RoleNotAssignable => "Cannot use that role",
            MercyError::RoleNotFound => "Mercy role missing",
            MercyError::AlreadyGranted(_) => "Already granted",
            MercyError::GrantFailed => "Could not grant role",
            MercyError::MessageTooLong => "Mercy speech too long",
        };
        ResponseError::Execution(title, Some(value.to_string()))
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

impl Response {
    pub fn new() -> Self {
        Response {
            content: None,
            embeds: None,
            allowed_mentions: None,
            components: None,
            ephemeral: false,
        }
    }

    /// The ephemeral reply shown to the user when a command or button fails.
    /// Platform errors are not shown verbatim.
    pub fn error(error: &ResponseError) -> Self {
        let embed = match error {
            ResponseError::Execution(title, description) => {
                let embed = CreateEmbed::new().title(*title).color(ERROR_COLOR);
                match description {
                    Some(description) => embed.description(description),
                    None => embed,
                }
            }
            ResponseError::UnknownCommand(name) => CreateEmbed::new()
                .title("Unknown command")
                .description(format!("I don't know how to handle `{name}`."))
                .color(ERROR_COLOR),
            ResponseError::Serenity(_) => CreateEmbed::new()
                .title("Something went wrong")
                .description("An error occurred while processing this interaction.")
                .color(ERROR_COLOR),
        };
        Response::new().embed(embed).ephemeral(true)
    }

    pub fn content(mut self, content: String) -> Self {
        self.content = Some(content);
        self
    }

    pub fn embed(mut self, embed: CreateEmbed) -> Self {
        self.embeds = Some(vec![embed]);
        self
    }

    pub fn components(mut self, components: Vec<CreateActionRow>) -> Self {
        self.components = Some(components);
        self
    }

    pub fn ephemeral(mut self, ephemeral: bool) -> Self {
        self.ephemeral = ephemeral;
        self
    }
}
