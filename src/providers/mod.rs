pub mod local;
pub mod memory;
pub mod session;

mod watchers;

pub use local::LocalDocumentStore;
pub use memory::MemoryDocumentStore;
pub use session::LocalSession;
