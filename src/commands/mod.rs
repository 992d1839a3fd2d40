use crate::models::command::Command;

pub mod giveaway;
pub mod mercy;

pub fn get_command_list() -> Vec<Box<dyn Command>> {
    vec![
        Box::new(giveaway::GiveawayCommand),
        Box::new(mercy::speech::MercySpeechCommand),
        Box::new(mercy::MercyCommand),
        Box::new(mercy::role::MercyRoleCommand),
    ]
}
