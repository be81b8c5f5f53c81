pub mod desktop;
pub mod launcher;
pub mod orchestrator;
pub mod types;

pub use desktop::{DescriptorResolver, DesktopEntry, candidate_app_name};
pub use launcher::LaunchPlan;
pub use orchestrator::RestoreOrchestrator;
pub use types::{RestoreOutcome, RestoreReport, RestoreSettings, WindowOutcome};
