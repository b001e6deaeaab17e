/// In-memory reader handing out the items of a `Vec` in order.
pub mod memory_reader;

pub use memory_reader::InMemoryItemReader;
