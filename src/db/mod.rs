pub mod pool;
pub mod query;
pub mod repository;

pub use repository::{Catalog, MemoryCatalog, MySqlCatalog};
