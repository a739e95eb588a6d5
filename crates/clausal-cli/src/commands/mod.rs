//! Command implementations.

pub mod analyze;
pub mod config;
pub mod list;
pub mod show;

pub use self::analyze::{analyze_file, execute_analyze, run_analysis};
pub use self::config::execute_config;
pub use self::list::execute_list;
pub use self::show::execute_show;
