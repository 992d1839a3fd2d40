pub mod command;
pub mod component;
pub mod config;
pub mod giveaway;
pub mod handler;
pub mod highest_role;
pub mod mercy;
pub mod response;
pub mod state;
