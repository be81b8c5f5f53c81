pub mod errors;
pub mod inspect;
pub mod spawn;

pub use errors::ProcessError;
pub use inspect::{ProcessInspector, SysinfoInspector, read_command_line};
pub use spawn::{CommandSpawner, ProcessSpawner};
