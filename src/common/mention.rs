use lazy_static::lazy_static;
use regex::Regex;

/// Strips `<`, `@`, `!` and `>` from a user mention, leaving the raw ID.
/// Nothing else is validated, so arbitrary text passes through unchanged.
pub fn strip_mention(raw: &str) -> String {
    lazy_static! {
        static ref MENTION_DECORATION: Regex = Regex::new(r"[<@!>]").unwrap();
    }

    MENTION_DECORATION.replace_all(raw, "").into_owned()
}
