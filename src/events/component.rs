use serenity::{all::ComponentInteraction, prelude::Context as IncomingContext};
use tracing::{debug, error, warn};

use crate::{
    commands::{giveaway, mercy},
    models::{
        command::{InteractionContext, InteractionContextReply},
        component::ComponentAction,
        handler::Handler,
        response::ResponseError,
    },
};

impl Handler {
    pub async fn on_component(&self, ctx: IncomingContext, component: ComponentInteraction) {
        let start = std::time::Instant::now();
        let interaction_context = InteractionContext::new(ctx, &component);

        let result = match ComponentAction::parse(&component.data.custom_id) {
            ComponentAction::GiveawayEntry(giveaway_id) => {
                giveaway::interaction::enter(self, &interaction_context, &giveaway_id).await
            }
            ComponentAction::MercyAccept => mercy::accept::accept(self, &interaction_context).await,
            ComponentAction::Unknown => {
                warn!("Received unknown component {}", component.data.custom_id);
                Err(ResponseError::Execution(
                    "Unknown button",
                    Some("This button is no longer handled.".to_string()),
                ))
            }
        };

        if let Err(err) = result {
            if let ResponseError::Serenity(_) = err {
                error!(
                    "Failed to handle component {}: {:?}",
                    component.data.custom_id, err
                );
            } else {
                debug!(
                    "Component {} was rejected: {:?}",
                    component.data.custom_id, err
                );
            }
            if let Err(err) = interaction_context.error_message(&err).await {
                error!("Failed to report component failure: {:?}", err);
            }
        }

        debug!("Took {:?} to handle a component", start.elapsed());
    }
}
