use std::collections::HashMap;

use serenity::all::{Role, RoleId, UserId};

use super::command::CommandContext;

/// Position of the highest guild role among `member_roles`. Roles missing
/// from the guild are ignored; a member with no roles sits at 0.
pub fn highest_position(member_roles: &[RoleId], guild_roles: &HashMap<RoleId, Role>) -> u16 {
    member_roles
        .iter()
        .filter_map(|role| guild_roles.get(role))
        .map(|role| role.position)
        .max()
        .unwrap_or(0)
}

pub async fn get_highest_role(ctx: &CommandContext, user_id: UserId) -> u16 {
    if ctx.guild.owner_id == user_id {
        return u16::MAX;
    }

    let Ok(member) = ctx.guild.id.member(&ctx.ctx, user_id).await else {
        return 0;
    };

    highest_position(&member.roles, &ctx.guild.roles)
}
