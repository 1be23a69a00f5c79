mod memory;
mod postgresql;
mod postgresql_repo;
mod r#trait;
mod wrapper;

// Repository trait
pub use r#trait::Repository;

// Repository implementations
pub use memory::MemoryRepository;
pub use postgresql_repo::PostgreSQLRepository;
pub use wrapper::RepositoryWrapper;

pub use postgresql::connect_db;
pub use postgresql::setup_db_schema;
