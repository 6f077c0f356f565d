//! CLI domain: parse, route and output only.
//! No domain orchestration; single route table dispatches to domain services.

mod output;
mod parse;
mod route;

pub use output::{format_status_text, map_error, ProjectStatus, SlotSummary};
pub use parse::{Cli, Commands, ExportFormat, ExportTarget, GenerateTarget};
pub use route::RunContext;
