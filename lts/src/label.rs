use std::fmt;

/// Serialised form of the hidden action, U+03C4.
pub const TAU: &str = "\u{3c4}";
/// Serialised form of the deadlock marker, U+03B4.
pub const DELTA: &str = "\u{3b4}";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    #[default]
    Plain,
    Broadcast,
    Listen,
}

impl Mode {
    pub fn prefix(self) -> &'static str {
        match self {
            Mode::Plain => "",
            Mode::Broadcast => "!",
            Mode::Listen => "?",
        }
    }
}

/// A user-visible action: the bare name plus the broadcast/listen flag that
/// was written as a `!`/`?` prefix in the source.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Act {
    pub name: String,
    pub mode: Mode,
}

impl Act {
    pub fn plain(name: impl Into<String>) -> Act {
        Act { name: name.into(), mode: Mode::Plain }
    }
}

impl fmt::Display for Act {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.mode.prefix(), self.name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Label {
    Tau,
    Delta,
    Act(Act),
}

impl Label {
    pub fn act(name: impl Into<String>) -> Label {
        Label::Act(Act::plain(name))
    }

    pub fn is_hidden(&self) -> bool {
        matches!(self, Label::Tau)
    }

    pub fn is_deadlock(&self) -> bool {
        matches!(self, Label::Delta)
    }

    /// The bare action name, with the broadcast/listen prefix stripped.
    pub fn bare_name(&self) -> Option<&str> {
        match self {
            Label::Act(act) => Some(&act.name),
            Label::Tau | Label::Delta => None,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Tau => f.write_str(TAU),
            Label::Delta => f.write_str(DELTA),
            Label::Act(act) => fmt::Display::fmt(act, f),
        }
    }
}
