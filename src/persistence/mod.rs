pub mod files;
pub mod settings;
pub mod store;

pub use files::{init_local_data_dir, resolve_data_dir, CONFIG_FILE, NOTES_FILE, TASKS_FILE};
pub use settings::load_settings;
pub use store::{NoteStore, TaskStore};
