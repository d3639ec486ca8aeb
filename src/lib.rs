//! In-memory, seekable byte buffer backed by lazily allocated fixed-size blocks.
//!
//! - **Block**: a zeroed [`BLOCK_SIZE`](page::BLOCK_SIZE) array, the unit of allocation
//! - **BlockIndex**: translation of a logical offset into (block, byte)
//! - **PagedBuffer**: read/write/seek over the block list, plus `std::io` trait impls
//! - **Observer**: optional diagnostic sink attached at construction

pub mod buffer;
pub mod error;
pub mod page;

pub use buffer::logging::LogObserver;
pub use buffer::observer::{BufferStats, NoopObserver, Observer, Snapshot};
pub use buffer::{PagedBuffer, ReadOutcome, SeekOrigin};
pub use error::{BufferError, BufferResult};
pub use page::{BLOCK_SIZE, Block, BlockIndex};
