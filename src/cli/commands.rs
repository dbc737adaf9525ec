pub mod analyze;
pub mod create_user;
pub mod initdb;
pub mod migrate_and_serve;
pub mod serve;

pub use analyze::analyze_file;
pub use create_user::create_user;
pub use initdb::init_database;
pub use migrate_and_serve::migrate_and_serve;
pub use serve::serve;
