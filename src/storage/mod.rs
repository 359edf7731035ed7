//! Target list persistence.
//!
//! The rest of the crate only sees [`AddressRepository`], so the flat text
//! file can be swapped for another backend without touching the scan or
//! menu code.

mod text_store;

pub use text_store::TextFileStore;

use crate::error::StoreResult;
use crate::types::TargetAddress;

/// Contents of the store as seen by a read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing {
    /// The backing store does not exist yet.
    Absent,
    /// Entries in insertion order. May be empty.
    Entries(Vec<String>),
}

impl Listing {
    /// Entries, treating an absent store as empty.
    pub fn into_entries(self) -> Vec<String> {
        match self {
            Self::Absent => Vec::new(),
            Self::Entries(entries) => entries,
        }
    }
}

/// What a removal did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// One entry was removed.
    Removed,
    /// The store exists but does not hold the address.
    NotPresent,
    /// There is no store to remove from.
    StoreAbsent,
}

impl RemoveOutcome {
    /// Whether anything was removed.
    pub fn removed(self) -> bool {
        matches!(self, Self::Removed)
    }
}

/// Storage for the list of scan targets.
pub trait AddressRepository {
    /// Human-readable location, used in messages.
    fn location(&self) -> String;

    /// Read every entry in insertion order.
    fn list(&self) -> StoreResult<Listing>;

    /// Validate and append an address.
    fn append(&self, addr: &str) -> StoreResult<TargetAddress>;

    /// Remove the first entry exactly equal to `addr`.
    fn remove(&self, addr: &str) -> StoreResult<RemoveOutcome>;

    /// Drop every entry.
    fn clear(&self) -> StoreResult<()>;
}
