pub mod collection;
pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;

pub use collection::{Collection, Document, StoreError};
pub use manager::Store;
pub use memory::MemoryCollection;
pub use postgres::PgCollection;
