//! Arena-backed Fibonacci heap.
//!
//! A Fibonacci heap is a priority queue built as a forest of min-ordered
//! trees whose roots sit in a circular ring:
//!
//! - O(1) amortized `insert`, `decrease_key`, and `union`
//! - O(log n) amortized `extract_min` and `delete`
//!
//! Nodes live in a generational arena ([`slotmap`]), so parent, sibling, and
//! child relations are plain handle fields rather than shared references.
//! That removes the ownership cycles a doubly-linked circular structure would
//! otherwise create, and it makes stale handles (to extracted or deleted
//! entries) detectable instead of undefined behavior.
//!
//! The structure is single-threaded and in-memory: every operation runs to
//! completion over process memory, with no suspension points and no internal
//! locking.
//!
//! # Example
//!
//! ```rust
//! use fibonacci_heap::FibonacciHeap;
//!
//! let mut heap = FibonacciHeap::new();
//! heap.insert(5, "write").unwrap();
//! heap.insert(3, "compile").unwrap();
//! let test = heap.insert(8, "test").unwrap();
//!
//! assert_eq!(heap.peek_min(), Some((&3, &"compile")));
//! assert_eq!(heap.extract_min(), Ok((3, "compile")));
//!
//! // decrease-key reaches into the middle of the heap through a handle
//! heap.decrease_key(test, 1).unwrap();
//! assert_eq!(heap.extract_min(), Ok((1, "test")));
//! ```

pub mod error;
pub mod heap;
pub mod node;
pub mod priority;
pub mod ring;

pub use error::HeapError;
pub use heap::FibonacciHeap;
pub use node::NodeHandle;
pub use priority::Priority;
