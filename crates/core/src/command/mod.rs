//! Command value objects and placeholder substitution

mod spec;
pub mod substitution;

// Re-export main types
pub use spec::{CommandEntry, CommandSpec, split_command_line};
pub use substitution::SubstitutionContext;
