pub mod loader;
pub mod prompts;
pub mod types;

pub use loader::{default_config_path, expand_home, load_or_create};
pub use types::{Config, ReactionKind};
