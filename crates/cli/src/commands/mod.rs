pub mod init;
pub mod list;
pub mod run;

pub use init::init_command;
pub use list::list_command;
pub use run::run_command;
