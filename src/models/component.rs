pub const GIVEAWAY_PREFIX: &str = "giveaway_";
pub const MERCY_ACCEPT: &str = "mercy_accept";

/// What a button click asks for, decoded from its custom ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentAction {
    GiveawayEntry(String),
    MercyAccept,
    Unknown,
}

impl ComponentAction {
    pub fn parse(custom_id: &str) -> Self {
        if custom_id == MERCY_ACCEPT {
            return ComponentAction::MercyAccept;
        }

        match custom_id.strip_prefix(GIVEAWAY_PREFIX) {
            Some(giveaway_id) if !giveaway_id.is_empty() => {
                ComponentAction::GiveawayEntry(giveaway_id.to_string())
            }
            _ => ComponentAction::Unknown,
        }
    }
}

pub fn giveaway_custom_id(giveaway_id: &str) -> String {
    format!("{GIVEAWAY_PREFIX}{giveaway_id}")
}
