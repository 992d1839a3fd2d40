use serenity::all::{ResolvedOption, ResolvedValue, Role};

#[derive(Debug, Clone)]
pub struct Options<'a> {
    pub options: Vec<ResolvedOption<'a>>,
}

impl<'a> Options<'a> {
    fn get(&self, name: &str) -> Option<&ResolvedValue<'a>> {
        self.options
            .iter()
            .find(|option| option.name == name)
            .map(|option| &option.value)
    }

    pub fn get_role(&self, name: &str) -> Option<&'a Role> {
        match self.get(name) {
            Some(ResolvedValue::Role(role)) => Some(*role),
            _ => None,
        }
    }

    pub fn get_string(&self, name: &str) -> Option<String> {
        match self.get(name) {
            Some(ResolvedValue::String(string)) => Some((*string).to_string()),
            _ => None,
        }
    }

    pub fn get_integer(&self, name: &str) -> Option<i64> {
        match self.get(name) {
            Some(ResolvedValue::Integer(integer)) => Some(*integer),
            _ => None,
        }
    }
}
