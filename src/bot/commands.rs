//! Classification of incoming message text.

/// Commands the bot answers with static text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
}

/// What to do with an incoming text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input<'a> {
    /// A known command.
    Command(Command),
    /// Plain text to relay to the model.
    Text(&'a str),
    /// A command that is unknown or addressed to a different bot.
    Ignored,
}

impl Command {
    fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "start" => Some(Command::Start),
            "help" => Some(Command::Help),
            _ => None,
        }
    }
}

/// Classify message text. `bot_username` is used to tell apart
/// `/help@this_bot` from `/help@other_bot` in group chats.
pub fn classify<'a>(text: &'a str, bot_username: Option<&str>) -> Input<'a> {
    let Some(rest) = text.strip_prefix('/') else {
        return Input::Text(text);
    };
    // Telegram only treats `/` followed by a name character as a command
    if !rest
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Input::Text(text);
    }

    let token = rest.split_whitespace().next().unwrap_or_default();
    let (name, addressee) = match token.split_once('@') {
        Some((name, addressee)) => (name, Some(addressee)),
        None => (token, None),
    };

    if let (Some(addressee), Some(me)) = (addressee, bot_username) {
        if !addressee.eq_ignore_ascii_case(me) {
            return Input::Ignored;
        }
    }

    match Command::from_name(name) {
        Some(command) => Input::Command(command),
        None => Input::Ignored,
    }
}
