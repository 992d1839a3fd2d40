use thiserror::Error;

pub const DEFAULT_MERCY_MESSAGE: &str = "Please show mercy!";
pub const MAX_MERCY_MESSAGE_LENGTH: usize = 2000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MercyError {
    #[error("No mercy role has been set! Use /mercyrole first.")]
    NoRoleConfigured,
    #[error("That role is at or above my highest role, so I cannot give it to anyone.")]
    RoleNotAssignable,
    #[error("The mercy role no longer exists in this server.")]
    RoleNotFound,
    #[error("You already have the {0} role!")]
    AlreadyGranted(String),
    #[error("Failed to give you the role. Check bot permissions.")]
    GrantFailed,
    #[error("Mercy speeches can be at most 2000 characters long.")]
    MessageTooLong,
}
