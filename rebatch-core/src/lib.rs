#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::cast_possible_truncation)]

pub mod case_model;
pub mod command;
pub mod console;
pub mod pattern;
pub mod record;
pub mod session;

pub use case_model::CaseStyle;
pub use command::{CommandRegistry, CommandSpec, Invocation, ParseError, PendArgs};
pub use console::{classify, Answer, Console, StdConsole};
pub use record::FileRecord;
pub use session::{Flow, RenameSession};
