pub mod collection;
pub mod files;
pub mod metadata;
pub mod stats_store;
pub mod task_store;

pub use collection::{Collection, JsonCollection, MemoryCollection, Record};
pub use files::{
    atomic_write, ensure_data_dir, get_data_dir, init_local_data_dir, read_file, CONFIG_FILE,
    DAILY_STATS_FILE, META_FILE, TASKS_FILE,
};
pub use metadata::{load_metadata, save_metadata, AppMetadata};
pub use stats_store::StatsStore;
pub use task_store::TaskStore;
