use std::collections::HashMap;

use serenity::{
    all::{Http, Member, Role, RoleId},
    builder::CreateEmbed,
};
use tracing::{error, info};

use crate::{
    database::store::Store,
    models::{
        command::{InteractionContext, InteractionContextReply},
        handler::Handler,
        mercy::MercyError,
        response::{Response, ResponseError, ResponseResult},
    },
};

const GRANTED_COLOR: i32 = 0x00ff00;

/// The member clicking Accept, as far as the mercy flow needs to see them.
#[async_trait::async_trait]
pub trait RoleGrantee: Send + Sync {
    fn role_name(&self, role_id: RoleId) -> Option<String>;
    fn has_role(&self, role_id: RoleId) -> bool;
    async fn grant(&self, role_id: RoleId) -> Result<(), serenity::Error>;
}

pub struct MemberGrantee<'a> {
    pub http: &'a Http,
    pub member: &'a Member,
    pub guild_roles: HashMap<RoleId, Role>,
}

#[async_trait::async_trait]
impl<'a> RoleGrantee for MemberGrantee<'a> {
    fn role_name(&self, role_id: RoleId) -> Option<String> {
        self.guild_roles.get(&role_id).map(|role| role.name.clone())
    }

    fn has_role(&self, role_id: RoleId) -> bool {
        self.member.roles.contains(&role_id)
    }

    async fn grant(&self, role_id: RoleId) -> Result<(), serenity::Error> {
        self.http
            .add_member_role(
                self.member.guild_id,
                self.member.user.id,
                role_id,
                Some("Accepted mercy"),
            )
            .await
    }
}

/// Grants the mercy role, returning its name. Members that already hold the
/// role are never granted it again.
pub async fn accept_mercy(store: &Store, grantee: &dyn RoleGrantee) -> Result<String, MercyError> {
    let role_id = store.mercy_role()?;
    let Some(role_name) = grantee.role_name(role_id) else {
        return Err(MercyError::RoleNotFound);
    };

    if grantee.has_role(role_id) {
        return Err(MercyError::AlreadyGranted(role_name));
    }

    if let Err(err) = grantee.grant(role_id).await {
        error!("Could not grant mercy role {role_id}. Failed with error: {err}");
        return Err(MercyError::GrantFailed);
    }

    Ok(role_name)
}

pub async fn accept(handler: &Handler, ctx: &InteractionContext<'_>) -> ResponseResult {
    handler.store.mercy_role()?;

    let Some(member) = ctx.interaction.member.as_ref() else {
        return Err(ResponseError::Execution(
            "Mercy can only be accepted in a server",
            None,
        ));
    };

    let cached_roles = member
        .guild_id
        .to_guild_cached(&ctx.ctx.cache)
        .map(|guild| guild.roles.clone());
    let guild_roles = match cached_roles {
        Some(roles) => roles,
        None => member.guild_id.roles(&ctx.ctx.http).await?,
    };

    let grantee = MemberGrantee {
        http: &ctx.ctx.http,
        member,
        guild_roles,
    };
    let role_name = accept_mercy(&handler.store, &grantee).await?;
    info!("Granted mercy role {role_name} to {}", member.user.id);

    ctx.reply(
        Response::new()
            .embed(
                CreateEmbed::new()
                    .title("Mercy accepted")
                    .description(format!("You have been granted the {role_name} role!"))
                    .color(GRANTED_COLOR),
            )
            .ephemeral(true),
    )
    .await
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    };

    use super::*;
    use crate::database::store::tests::{temp_state_path, TempStatePath};

    struct FakeMember {
        guild_roles: HashMap<RoleId, String>,
        roles: Mutex<Vec<RoleId>>,
        grants: AtomicUsize,
        fail_grants: bool,
    }

    impl FakeMember {
        fn new(guild_roles: &[(u64, &str)]) -> Self {
            FakeMember {
                guild_roles: guild_roles
                    .iter()
                    .map(|(id, name)| (RoleId::new(*id), (*name).to_string()))
                    .collect(),
                roles: Mutex::new(vec![]),
                grants: AtomicUsize::new(0),
                fail_grants: false,
            }
        }
    }

    #[async_trait::async_trait]
    impl RoleGrantee for FakeMember {
        fn role_name(&self, role_id: RoleId) -> Option<String> {
            self.guild_roles.get(&role_id).cloned()
        }

        fn has_role(&self, role_id: RoleId) -> bool {
            self.roles.lock().unwrap().contains(&role_id)
        }

        async fn grant(&self, role_id: RoleId) -> Result<(), serenity::Error> {
            self.grants.fetch_add(1, Ordering::SeqCst);
            if self.fail_grants {
                return Err(serenity::Error::Other("Missing Permissions"));
            }
            self.roles.lock().unwrap().push(role_id);
            Ok(())
        }
    }

    fn store_with_role(name: &str, role_id: u64) -> (TempStatePath, Store) {
        let path = temp_state_path(name);
        let store = Store::load(&path);
        store.set_mercy_role(RoleId::new(role_id), 1, 10).unwrap();
        (path, store)
    }

    #[tokio::test]
    async fn grants_once_then_reports_already_granted() {
        let (_path, store) = store_with_role("accept-twice", 5);
        let member = FakeMember::new(&[(5, "Spared")]);

        assert_eq!(accept_mercy(&store, &member).await, Ok("Spared".to_string()));
        assert_eq!(
            accept_mercy(&store, &member).await,
            Err(MercyError::AlreadyGranted("Spared".to_string()))
        );
        assert_eq!(member.grants.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn requires_a_configured_role() {
        let path = temp_state_path("accept-unset");
        let store = Store::load(&path);
        let member = FakeMember::new(&[(5, "Spared")]);

        assert_eq!(
            accept_mercy(&store, &member).await,
            Err(MercyError::NoRoleConfigured)
        );
        assert_eq!(member.grants.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn deleted_roles_are_reported() {
        let (_path, store) = store_with_role("accept-deleted", 5);
        let member = FakeMember::new(&[(6, "Other")]);

        assert_eq!(
            accept_mercy(&store, &member).await,
            Err(MercyError::RoleNotFound)
        );
        assert_eq!(member.grants.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn platform_failures_become_grant_failed() {
        let (_path, store) = store_with_role("accept-forbidden", 5);
        let member = FakeMember {
            fail_grants: true,
            ..FakeMember::new(&[(5, "Spared")])
        };

        assert_eq!(
            accept_mercy(&store, &member).await,
            Err(MercyError::GrantFailed)
        );
        assert!(!member.has_role(RoleId::new(5)));
    }
}
