// Adapters - External system implementations

pub mod fs_local;
pub mod probe_ffprobe;
pub mod process_std;
pub mod toml_config;
pub mod tracing_progress;

// Re-export adapters
pub use fs_local::LocalFsAdapter;
pub use probe_ffprobe::FfprobeAdapter;
pub use process_std::StdProcessAdapter;
pub use toml_config::{load_config_file, load_default_config};
pub use tracing_progress::TracingProgressAdapter;
