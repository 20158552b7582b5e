pub mod artifact_filer;
pub mod artifact_resolver;
pub mod run_log;
pub mod session_controller;

pub use artifact_filer::ArtifactFiler;
pub use artifact_resolver::{ArtifactResolver, DirSnapshot};
pub use run_log::{write_summary, RunLog};
pub use session_controller::{Session, SessionController};
