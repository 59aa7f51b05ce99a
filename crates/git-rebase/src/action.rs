use std::fmt;

/// Action applied to a single commit in an interactive rebase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RebaseAction {
    /// Apply the commit as is.
    Pick,
    /// Apply, then edit the message.
    Reword,
    /// Apply, then stop for amending.
    Edit,
    /// Fold into the previous commit, combining messages.
    Squash,
    /// Fold into the previous commit, keeping the previous message.
    Fixup,
    /// Leave the commit out.
    Drop,
}

impl RebaseAction {
    pub const ALL: [RebaseAction; 6] = [
        Self::Pick,
        Self::Reword,
        Self::Edit,
        Self::Squash,
        Self::Fixup,
        Self::Drop,
    ];

    /// The command word written to a todo file.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pick => "pick",
            Self::Reword => "reword",
            Self::Edit => "edit",
            Self::Squash => "squash",
            Self::Fixup => "fixup",
            Self::Drop => "drop",
        }
    }

    /// One-letter abbreviation (`rebase.abbreviateCommands`).
    pub fn short(self) -> char {
        match self {
            Self::Pick => 'p',
            Self::Reword => 'r',
            Self::Edit => 'e',
            Self::Squash => 's',
            Self::Fixup => 'f',
            Self::Drop => 'd',
        }
    }

    /// Parse a command word, long or abbreviated.
    pub fn from_command(word: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|action| {
                word == action.as_str() || (word.len() == 1 && word.starts_with(action.short()))
            })
    }
}

impl fmt::Display for RebaseAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
