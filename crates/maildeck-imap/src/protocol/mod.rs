//! Session-level protocol rules.

pub mod state;

pub use state::{
    Arity, CommandRejection, SessionState, StateRequirement, check_state_and_args,
    count_arguments,
};
