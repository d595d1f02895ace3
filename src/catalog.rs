use std::fmt;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::index::{Index, OrderedIndex};
use crate::queue::{BookId, Reservation, ReservationQueue};
use crate::snapshot::Snapshot;

/// A book in the catalog. Availability is the only field mutated after
/// the book is added.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub is_available: bool,
}

impl Book {
    pub fn new<S, T>(id: BookId, title: S, author: T) -> Book
    where
        S: Into<String>,
        T: Into<String>,
    {
        Book {
            id,
            title: title.into(),
            author: author.into(),
            is_available: true,
        }
    }
}

/// BookIds allocate ids for new books. Ids are monotonic and never
/// reused, even across [`LibraryCatalog::restore`]. Once `BookId::MAX`
/// is handed out or observed the allocator is exhausted for good.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BookIds {
    next: Option<BookId>, // None when exhausted.
}

impl BookIds {
    pub fn starting_at(next: BookId) -> BookIds {
        BookIds { next: Some(next) }
    }

    /// Hand out the next id, None if the allocator is exhausted.
    pub fn next_id(&mut self) -> Option<BookId> {
        let id = self.next?;
        self.next = id.checked_add(1);
        Some(id)
    }

    /// Make sure `id` is never handed out again.
    pub fn observe(&mut self, id: BookId) {
        match self.next {
            Some(next) if id >= next => self.next = id.checked_add(1),
            _ => (),
        }
    }

    /// Peek at the id the next call to `next_id` returns.
    pub fn peek(&self) -> Option<BookId> {
        self.next
    }
}

/// Request refused because the book is already available.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Request {
    Return,
    Reserve,
}

/// Successful result of a catalog operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Borrowed(Book),
    Returned(Book),
    Reserved(Reservation),
    /// Reservation taken off the queue, its book is available again.
    Processed { reservation: Reservation, book: Book },
}

/// Outcome of every catalog operation. Logical failures are reported
/// here and never leave the catalog partially mutated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Success(Event),
    NotFound(BookId),
    AlreadyAvailable { book: Book, request: Request },
    AlreadyUnavailable(Book),
    NoReservations,
    /// Dequeued reservation refers to a missing or available book. The
    /// reservation is consumed regardless.
    ReservationProcessingInconsistency(Reservation),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        match self {
            Outcome::Success(_) => true,
            _ => false,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Outcome::Success(Event::Borrowed(book)) => {
                write!(f, "Book borrowed successfully: {}", book.title)
            }
            Outcome::Success(Event::Returned(book)) => {
                write!(f, "Book returned successfully: {}", book.title)
            }
            Outcome::Success(Event::Reserved(r)) => {
                write!(f, "Book reserved for {}", r.requester_name)
            }
            Outcome::Success(Event::Processed { reservation, book }) => write!(
                f,
                "Reservation processed for {} - Book: {}",
                reservation.requester_name, book.title
            ),
            Outcome::NotFound(id) => write!(f, "Book not found: {}", id),
            Outcome::AlreadyAvailable {
                book,
                request: Request::Return,
            } => write!(f, "Book was already in library: {}", book.title),
            Outcome::AlreadyAvailable {
                request: Request::Reserve,
                ..
            } => write!(f, "Book is available, no need to reserve"),
            Outcome::AlreadyUnavailable(book) => {
                write!(f, "Book is not available: {}", book.title)
            }
            Outcome::NoReservations => write!(f, "No reservations in queue"),
            Outcome::ReservationProcessingInconsistency(r) => write!(
                f,
                "Error processing reservation for {} - Book id: {}",
                r.requester_name, r.book_id
            ),
        }
    }
}

/// LibraryCatalog ties book availability to the reservation queue.
///
/// Books are indexed by id in `I`, defaults to the unbalanced [`Index`].
/// The catalog is a plain owned value; hosts sharing it across threads
/// must guard the whole catalog with a single lock, since borrow, return
/// and reserve are find-then-mutate sequences.
pub struct LibraryCatalog<I = Index<BookId, Book>> {
    by_id: I,
    pending: ReservationQueue,
    ids: BookIds,
}

const STARTER_BOOKS: [(&str, &str); 2] = [
    ("The Great Gatsby", "F. Scott Fitzgerald"),
    ("1984", "George Orwell"),
];

impl LibraryCatalog {
    /// Create a catalog as per `config`. It holds the starter books when
    /// `config.seed_books` is set, otherwise it is empty.
    pub fn new(config: &Config) -> LibraryCatalog {
        let by_id = Index::new(&config.books_index);
        let ids = BookIds::starting_at(config.first_book_id);
        let mut catalog = LibraryCatalog::with_index(by_id, ids);
        if config.seed_books {
            catalog.add_starter_books();
        }
        catalog
    }

    /// Create a catalog holding the starter books, regardless of
    /// `config.seed_books`.
    pub fn seeded(config: &Config) -> LibraryCatalog {
        let mut catalog = LibraryCatalog::new(&Config {
            seed_books: false,
            ..config.clone()
        });
        catalog.add_starter_books();
        catalog
    }

    fn add_starter_books(&mut self) {
        for (title, author) in STARTER_BOOKS.iter() {
            if let Err(err) = self.add_book(*title, *author) {
                warn!(target: "catalog", "starter book {:?}: {}", title, err);
            }
        }
    }
}

impl<I> LibraryCatalog<I>
where
    I: OrderedIndex<BookId, Book>,
{
    /// Create a catalog over an existing index. `ids` is advanced past
    /// every id already present in `by_id`.
    pub fn with_index(by_id: I, mut ids: BookIds) -> LibraryCatalog<I> {
        if let Some(max) = by_id.values().map(|book| book.id).max() {
            ids.observe(max);
        }
        LibraryCatalog {
            by_id,
            pending: ReservationQueue::new(),
            ids,
        }
    }

    /// Add a new, available, book under the next id. Fails only when
    /// the id space is exhausted, the catalog is left untouched.
    pub fn add_book<S, T>(&mut self, title: S, author: T) -> Result<Book>
    where
        S: Into<String>,
        T: Into<String>,
    {
        let id = self.ids.next_id().ok_or(Error::IdsExhausted)?;
        let book = Book::new(id, title, author);
        debug!(target: "catalog", "add book {} {:?}", book.id, book.title);
        self.by_id.insert(book.id, book.clone());
        Ok(book)
    }

    pub fn find_book(&self, id: BookId) -> Option<&Book> {
        self.by_id.get(&id)
    }

    /// All books sorted by id, for rendering the full catalog.
    pub fn books(&self) -> impl Iterator<Item = &Book> {
        self.by_id.values()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Pending reservations, oldest first.
    pub fn pending(&self) -> &ReservationQueue {
        &self.pending
    }

    pub fn ids(&self) -> &BookIds {
        &self.ids
    }

    /// Mark an available book as borrowed.
    pub fn borrow(&mut self, id: BookId) -> Outcome {
        let outcome = match self.by_id.get_mut(&id) {
            None => Outcome::NotFound(id),
            Some(book) if book.is_available => {
                book.is_available = false;
                Outcome::Success(Event::Borrowed(book.clone()))
            }
            Some(book) => Outcome::AlreadyUnavailable(book.clone()),
        };
        debug!(target: "catalog", "borrow {}: {}", id, outcome);
        outcome
    }

    /// Mark a borrowed book as available. Returning an available book
    /// is a no-op. Pending reservations are not processed.
    pub fn return_book(&mut self, id: BookId) -> Outcome {
        let outcome = match self.by_id.get_mut(&id) {
            None => Outcome::NotFound(id),
            Some(book) if !book.is_available => {
                book.is_available = true;
                Outcome::Success(Event::Returned(book.clone()))
            }
            Some(book) => Outcome::AlreadyAvailable {
                book: book.clone(),
                request: Request::Return,
            },
        };
        debug!(target: "catalog", "return {}: {}", id, outcome);
        outcome
    }

    /// Queue `requester_name` for a borrowed book. Available books are
    /// never reserved.
    pub fn reserve<S>(&mut self, id: BookId, requester_name: S) -> Outcome
    where
        S: Into<String>,
    {
        let outcome = match self.by_id.get(&id) {
            None => Outcome::NotFound(id),
            Some(book) if book.is_available => Outcome::AlreadyAvailable {
                book: book.clone(),
                request: Request::Reserve,
            },
            Some(_) => {
                let reservation = Reservation::new(id, requester_name);
                self.pending.push(reservation.clone());
                Outcome::Success(Event::Reserved(reservation))
            }
        };
        debug!(target: "catalog", "reserve {}: {}", id, outcome);
        outcome
    }

    /// Take the oldest reservation off the queue and release its book.
    pub fn process_next_reservation(&mut self) -> Outcome {
        let reservation = match self.pending.dequeue() {
            Some(reservation) => reservation,
            None => return Outcome::NoReservations,
        };
        match self.by_id.get_mut(&reservation.book_id) {
            Some(book) if !book.is_available => {
                book.is_available = true;
                let book = book.clone();
                let outcome = Outcome::Success(Event::Processed { reservation, book });
                debug!(target: "catalog", "{}", outcome);
                outcome
            }
            _ => {
                warn!(
                    target: "catalog",
                    "reservation for book {} by {:?} does not match catalog state",
                    reservation.book_id,
                    reservation.requester_name
                );
                Outcome::ReservationProcessingInconsistency(reservation)
            }
        }
    }

    /// Complete state of the catalog, books in id order and
    /// reservations oldest first.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            books: self.by_id.values().cloned().collect(),
            reservations: self.pending.iter().cloned().collect(),
        }
    }

    /// Discard current state and rebuild from `snapshot`. Books are
    /// inserted in snapshot order, a repeated id keeps its first entry.
    /// The id allocator only moves forward.
    pub fn restore(&mut self, snapshot: Snapshot) {
        let Snapshot {
            books,
            reservations,
        } = snapshot;

        self.by_id.clear();
        for book in books.into_iter() {
            self.ids.observe(book.id);
            let id = book.id;
            if !self.by_id.insert(id, book) {
                debug!(target: "catalog", "restore skipped duplicate book {}", id);
            }
        }
        self.pending.clear();
        self.pending.extend(reservations);

        info!(
            target: "catalog",
            "restored {} books, {} reservations, next id {:?}",
            self.by_id.len(),
            self.pending.len(),
            self.ids.peek()
        );
    }
}
