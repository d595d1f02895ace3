//! Core of a library catalog: books indexed by id, accounts indexed by
//! username, both in an unbalanced binary search tree, and a FIFO queue
//! of reservations for borrowed books.

mod catalog;
mod config;
mod depth;
mod error;
mod index;
mod queue;
mod snapshot;
mod users;

pub use crate::catalog::{Book, BookIds, Event, LibraryCatalog, Outcome, Request};
pub use crate::config::Config;
pub use crate::depth::Depth;
pub use crate::error::{Error, Result};
pub use crate::index::{Index, Iter, OrderedIndex, Stats};
pub use crate::queue::{BookId, Reservation, ReservationQueue};
pub use crate::snapshot::Snapshot;
pub use crate::users::{Landing, Login, User, UserDirectory};

#[cfg(test)]
mod queue_test;
#[cfg(test)]
mod users_test;
