pub mod memory;
pub mod traits;
pub mod types;

pub use memory::InMemoryItemStore;
pub use traits::ItemStore;
pub use types::{ItemQuery, UpdateResult};
