//! Inbound events that drive a dialog

/// Commands the bot reacts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/add`: begin (or restart) a dialog
    Add,
    /// `/cancel`: abort the current dialog
    Cancel,
    /// `/start`: greeting, handled outside the dialog
    Start,
    /// Any other command, ignored
    Other(String),
}

impl Command {
    /// Parse a command name without the leading slash or `@bot` suffix
    pub fn from_name(name: &str) -> Self {
        match name {
            "add" => Command::Add,
            "cancel" => Command::Cancel,
            "start" => Command::Start,
            other => Command::Other(other.to_string()),
        }
    }
}

/// Events that trigger state transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Command(Command),
    Text(String),
}

impl Event {
    /// Classify raw message text.
    ///
    /// A message is a command when its first token starts with `/`. Arguments
    /// after the command name are dropped. A command addressed to another bot
    /// (`/add@other_bot`) is kept whole so it matches nothing; with no known
    /// `bot_username` every `@` suffix is accepted.
    pub fn from_text(text: &str, bot_username: Option<&str>) -> Self {
        let Some(rest) = text.strip_prefix('/') else {
            return Event::Text(text.to_string());
        };
        let token = rest.split_whitespace().next().unwrap_or_default();
        let (name, addressee) = match token.split_once('@') {
            Some((name, addressee)) => (name, Some(addressee)),
            None => (token, None),
        };
        match (addressee, bot_username) {
            (Some(addressee), Some(me)) if !addressee.eq_ignore_ascii_case(me) => {
                Event::Command(Command::Other(token.to_string()))
            }
            _ => Event::Command(Command::from_name(name)),
        }
    }
}
