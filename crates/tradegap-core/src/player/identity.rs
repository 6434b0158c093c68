// Player identity keys for joining tables from different providers.
//
// Providers disagree on capitalization, punctuation and generational
// suffixes ("D.J. Moore" vs "DJ Moore", "Marvin Harrison Jr." vs
// "Marvin Harrison"). The identity key folds those differences away; any
// other spelling difference is a miss, never a guess.

use std::fmt;

/// Generational suffixes dropped from the end of a name.
const SUFFIXES: &[&str] = &["jr", "sr", "ii", "iii", "iv", "v"];

/// Canonical join key for a player name.
///
/// Two names join only when their keys are equal. The raw name is kept on
/// every record for display; this key never leaves the join logic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerIdentity(String);

impl PlayerIdentity {
    /// Build the identity key for a raw player name.
    ///
    /// Lowercases, turns hyphens into spaces, drops every other non-alphanumeric
    /// character, collapses whitespace and strips one trailing generational
    /// suffix. A name that consists only of a suffix keeps it.
    pub fn from_name(name: &str) -> Self {
        let cleaned: String = name
            .chars()
            .flat_map(char::to_lowercase)
            .filter_map(|c| match c {
                '-' => Some(' '),
                c if c.is_alphanumeric() || c.is_whitespace() => Some(c),
                _ => None,
            })
            .collect();

        let mut tokens: Vec<&str> = cleaned.split_whitespace().collect();
        if tokens.len() > 1 {
            if let Some(last) = tokens.last() {
                if SUFFIXES.contains(last) {
                    tokens.pop();
                }
            }
        }

        PlayerIdentity(tokens.join(" "))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the name had no usable characters at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for PlayerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
