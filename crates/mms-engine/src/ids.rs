//! Order-id allocation.
//!
//! Ids are monotonically increasing and never reused. The allocator is a
//! plain value owned by whoever creates orders (normally the
//! [`Broker`](crate::Broker)), so two brokers in the same process never share
//! or disturb each other's sequence.
//!
//! Allocation takes `&mut self`; there is no interior mutability.

/// Monotonic order-id source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderIdAllocator {
    next: u64,
}

impl Default for OrderIdAllocator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl OrderIdAllocator {
    /// First id handed out is 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// First id handed out is `first`.
    pub fn starting_at(first: u64) -> Self {
        Self { next: first }
    }

    /// Hand out the next id.
    pub fn next_id(&mut self) -> u64 {
        let id = self.next;
        self.next = self.next.saturating_add(1);
        id
    }

    /// The id the next call to [`next_id`](Self::next_id) will return.
    pub fn peek(&self) -> u64 {
        self.next
    }
}
