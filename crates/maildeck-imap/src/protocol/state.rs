//! Session states and command prerequisites.
//!
//! A command may only run in some states (RFC 3501 section 3). The
//! [`check_state_and_args`] helper enforces that prerequisite together
//! with the command's argument count, producing the `BAD` reply text.

use thiserror::Error;

use crate::parser::lexer::Token;

/// Session state as defined by RFC 3501.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Waiting for credentials.
    #[default]
    NotAuthenticated,
    /// Logged in, no mailbox open.
    Authenticated,
    /// Logged in with a mailbox open.
    Selected,
    /// Connection is closing.
    Logout,
}

impl SessionState {
    /// Returns `true` for authenticated and selected sessions.
    #[must_use]
    pub const fn is_authenticated(self) -> bool {
        matches!(self, Self::Authenticated | Self::Selected)
    }
}

/// State a command requires before it can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateRequirement {
    /// Valid in every state (CAPABILITY, NOOP, LOGOUT).
    Any,
    /// Only before login (LOGIN, AUTHENTICATE, STARTTLS).
    NotAuthenticated,
    /// After login; a selected session qualifies too.
    Authenticated,
    /// Only with a mailbox open (FETCH, STORE, ...).
    Selected,
}

impl StateRequirement {
    /// Returns true if a session in `state` may run the command.
    #[must_use]
    pub const fn is_met_by(self, state: SessionState) -> bool {
        match self {
            Self::Any => true,
            Self::NotAuthenticated => matches!(state, SessionState::NotAuthenticated),
            Self::Authenticated => state.is_authenticated(),
            Self::Selected => matches!(state, SessionState::Selected),
        }
    }
}

/// Number of arguments a command takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arity {
    /// Fewest accepted arguments.
    pub min: usize,
    /// Most accepted arguments; `None` for no upper bound.
    pub max: Option<usize>,
}

impl Arity {
    /// Exactly `n` arguments.
    #[must_use]
    pub const fn exactly(n: usize) -> Self {
        Self {
            min: n,
            max: Some(n),
        }
    }

    /// At least `n` arguments.
    #[must_use]
    pub const fn at_least(n: usize) -> Self {
        Self { min: n, max: None }
    }

    /// Between `min` and `max` arguments, inclusive.
    #[must_use]
    pub const fn between(min: usize, max: usize) -> Self {
        Self {
            min,
            max: Some(max),
        }
    }

    /// The noun used when arguments are missing: singular only for
    /// commands that take exactly one.
    #[must_use]
    pub const fn missing_noun(self) -> &'static str {
        match (self.min, self.max) {
            (1, Some(1)) => "argument",
            _ => "argument(s)",
        }
    }
}

/// Why a command was refused before it ran.
///
/// The `Display` text is the reply after the tag.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandRejection {
    /// The session is in the wrong state.
    #[error("BAD {command} command received in invalid state")]
    InvalidState {
        /// Command name.
        command: String,
    },

    /// Too few arguments.
    #[error("BAD missing {noun} to {command}", noun = .arity.missing_noun())]
    MissingArguments {
        /// Command name.
        command: String,
        /// What the command accepts.
        arity: Arity,
    },

    /// Too many arguments.
    #[error("BAD too many arguments to {command}")]
    TooManyArguments {
        /// Command name.
        command: String,
    },
}

impl CommandRejection {
    /// Returns the full tagged reply line.
    #[must_use]
    pub fn to_response(&self, tag: &str) -> String {
        format!("{tag} {self}\r\n")
    }
}

/// Counts top-level arguments.
///
/// A parenthesized group is one argument. A bracketed group, and a
/// `<start.count>` suffix after it, belong to the argument before them
/// (`BODY[HEADER]<0.10>` is one argument).
#[must_use]
pub fn count_arguments(args: &[Token]) -> usize {
    let mut count = 0;
    let mut depth = 0usize;
    let mut after_bracket = false;

    for token in args {
        let attached = match token {
            Token::LBracket => true,
            Token::Atom(s) => after_bracket && s.starts_with('<'),
            _ => false,
        };
        if depth == 0 && !attached {
            count += 1;
        }

        after_bracket = false;
        match token {
            Token::LParen | Token::LBracket => depth += 1,
            Token::RParen => depth = depth.saturating_sub(1),
            Token::RBracket => {
                depth = depth.saturating_sub(1);
                after_bracket = depth == 0;
            }
            _ => {}
        }
    }
    count
}

/// Checks that `command` may run in `state` with `args`.
///
/// # Errors
///
/// Returns the [`CommandRejection`] to send back to the client.
pub fn check_state_and_args(
    command: &str,
    required: StateRequirement,
    state: SessionState,
    args: &[Token],
    arity: Arity,
) -> Result<(), CommandRejection> {
    let command = command.to_ascii_uppercase();

    if !required.is_met_by(state) {
        tracing::debug!(%command, ?state, ?required, "Command refused in current state");
        return Err(CommandRejection::InvalidState { command });
    }

    let count = count_arguments(args);
    if count < arity.min {
        return Err(CommandRejection::MissingArguments { command, arity });
    }
    if arity.max.is_some_and(|max| count > max) {
        return Err(CommandRejection::TooManyArguments { command });
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::parser::lexer::tokenize;

    #[test]
    fn test_requirements() {
        assert!(StateRequirement::Any.is_met_by(SessionState::Logout));
        assert!(StateRequirement::NotAuthenticated.is_met_by(SessionState::NotAuthenticated));
        assert!(!StateRequirement::NotAuthenticated.is_met_by(SessionState::Selected));
        assert!(StateRequirement::Authenticated.is_met_by(SessionState::Selected));
        assert!(!StateRequirement::Authenticated.is_met_by(SessionState::NotAuthenticated));
        assert!(!StateRequirement::Selected.is_met_by(SessionState::Authenticated));
    }

    #[test]
    fn test_count_arguments() {
        let count = |s: &str| count_arguments(&tokenize(s).unwrap());
        assert_eq!(count(""), 0);
        assert_eq!(count("INBOX"), 1);
        assert_eq!(count("1:4 (FLAGS UID)"), 2);
        assert_eq!(count("1:4 BODY[HEADER.FIELDS (DATE)]<0.10>"), 2);
        assert_eq!(count("user \"pass word\""), 2);
        assert_eq!(count("\"\" \"*\""), 2);
    }

    #[test]
    fn test_check_invalid_state() {
        let args = tokenize("1 FLAGS").unwrap();
        let err = check_state_and_args(
            "fetch",
            StateRequirement::Selected,
            SessionState::Authenticated,
            &args,
            Arity::exactly(2),
        )
        .unwrap_err();

        assert_eq!(err.to_string(), "BAD FETCH command received in invalid state");
        assert_eq!(
            err.to_response("A7"),
            "A7 BAD FETCH command received in invalid state\r\n"
        );
    }

    #[test]
    fn test_check_arity() {
        let args = tokenize("INBOX").unwrap();
        let err = check_state_and_args(
            "RENAME",
            StateRequirement::Authenticated,
            SessionState::Selected,
            &args,
            Arity::exactly(2),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "BAD missing argument(s) to RENAME");

        let args = tokenize("a b c").unwrap();
        let err = check_state_and_args(
            "LOGIN",
            StateRequirement::NotAuthenticated,
            SessionState::NotAuthenticated,
            &args,
            Arity::exactly(2),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "BAD too many arguments to LOGIN");
    }

    #[test]
    fn test_missing_single_argument() {
        let args = tokenize("").unwrap();
        let err = check_state_and_args(
            "SELECT",
            StateRequirement::Authenticated,
            SessionState::Authenticated,
            &args,
            Arity::exactly(1),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "BAD missing argument to SELECT");
        assert_eq!(
            err,
            CommandRejection::MissingArguments {
                command: "SELECT".to_owned(),
                arity: Arity::exactly(1),
            }
        );
    }

    #[test]
    fn test_check_passes() {
        let args = tokenize("1:* (FLAGS BODY.PEEK[])").unwrap();
        assert!(
            check_state_and_args(
                "FETCH",
                StateRequirement::Selected,
                SessionState::Selected,
                &args,
                Arity::exactly(2),
            )
            .is_ok()
        );

        assert!(
            check_state_and_args(
                "NOOP",
                StateRequirement::Any,
                SessionState::NotAuthenticated,
                &[],
                Arity::between(0, 0),
            )
            .is_ok()
        );

        let args = tokenize("INBOX (\\Seen) {5}").unwrap();
        assert!(
            check_state_and_args(
                "APPEND",
                StateRequirement::Authenticated,
                SessionState::Authenticated,
                &args,
                Arity::at_least(2),
            )
            .is_ok()
        );
    }
}
