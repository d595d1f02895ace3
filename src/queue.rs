use serde::{Deserialize, Serialize};
use slab::Slab;

use crate::error::{Error, Result};

/// Book ids are allocated by [`crate::BookIds`], monotonic and never reused.
pub type BookId = u64;

/// A pending request by `requester_name` for book `book_id`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub book_id: BookId,
    pub requester_name: String,
}

impl Reservation {
    pub fn new<S>(book_id: BookId, requester_name: S) -> Reservation
    where
        S: Into<String>,
    {
        Reservation {
            book_id,
            requester_name: requester_name.into(),
        }
    }
}

#[derive(Debug)]
struct QNode {
    item: Reservation,
    next: Option<usize>, // slab handle of the following node.
}

/// ReservationQueue is a singly linked FIFO of [`Reservation`].
///
/// Nodes are stored in a [`Slab`], links are slab handles. `front` is the
/// head of the chain, `rear` points at the last node so that enqueue is
/// O(1). Both are either set or unset together.
#[derive(Debug, Default)]
pub struct ReservationQueue {
    nodes: Slab<QNode>,
    front: Option<usize>,
    rear: Option<usize>,
}

impl ReservationQueue {
    pub fn new() -> ReservationQueue {
        Default::default()
    }

    /// Append a reservation at the rear of the queue.
    pub fn enqueue<S>(&mut self, book_id: BookId, requester_name: S)
    where
        S: Into<String>,
    {
        self.push(Reservation::new(book_id, requester_name))
    }

    /// Append an already built reservation at the rear of the queue.
    pub fn push(&mut self, item: Reservation) {
        let key = self.nodes.insert(QNode { item, next: None });
        match self.rear {
            Some(rear) => self.nodes[rear].next = Some(key),
            None => self.front = Some(key),
        }
        self.rear = Some(key);
    }

    /// Remove and return the oldest reservation, None if queue is empty.
    pub fn dequeue(&mut self) -> Option<Reservation> {
        let key = self.front?;
        let node = self.nodes.remove(key);
        self.front = node.next;
        if self.front.is_none() {
            self.rear = None;
        }
        Some(node.item)
    }

    /// Peek at the oldest reservation.
    pub fn front(&self) -> Option<&Reservation> {
        self.front.map(|key| &self.nodes[key].item)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.front.is_none()
    }

    /// Drop all pending reservations.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.front = None;
        self.rear = None;
    }

    /// Iterate over reservations, oldest first.
    pub fn iter(&self) -> Iter {
        Iter {
            queue: self,
            next: self.front,
        }
    }

    /// Check that front and rear agree on emptiness, and that the chain
    /// from front visits every stored node and ends exactly at rear.
    pub fn validate(&self) -> Result<()> {
        match (self.front, self.rear) {
            (None, None) if self.nodes.is_empty() => return Ok(()),
            (None, None) => {
                let msg = format!("empty chain holding {} nodes", self.nodes.len());
                return Err(Error::BrokenQueue(msg));
            }
            (Some(_), None) | (None, Some(_)) => {
                let msg = format!("front {:?} rear {:?}", self.front, self.rear);
                return Err(Error::BrokenQueue(msg));
            }
            (Some(_), Some(_)) => (),
        }

        let (mut key, mut last, mut visited) = (self.front, None, 0);
        while let Some(k) = key {
            let node = self.nodes.get(k).ok_or_else(|| {
                let msg = format!("dangling handle {}", k);
                Error::BrokenQueue(msg)
            })?;
            visited += 1;
            if visited > self.nodes.len() {
                return Err(Error::BrokenQueue("cycle in chain".to_string()));
            }
            last = Some(k);
            key = node.next;
        }
        if last != self.rear {
            let msg = format!("chain ends at {:?}, rear is {:?}", last, self.rear);
            return Err(Error::BrokenQueue(msg));
        }
        if visited != self.nodes.len() {
            let msg = format!("visited {} of {} nodes", visited, self.nodes.len());
            return Err(Error::BrokenQueue(msg));
        }
        Ok(())
    }
}

impl Extend<Reservation> for ReservationQueue {
    fn extend<I: IntoIterator<Item = Reservation>>(&mut self, iter: I) {
        iter.into_iter().for_each(|item| self.push(item))
    }
}

impl std::iter::FromIterator<Reservation> for ReservationQueue {
    fn from_iter<I: IntoIterator<Item = Reservation>>(iter: I) -> Self {
        let mut queue = ReservationQueue::new();
        queue.extend(iter);
        queue
    }
}

/// FIFO iterator over [`ReservationQueue`].
pub struct Iter<'a> {
    queue: &'a ReservationQueue,
    next: Option<usize>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Reservation;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.queue.nodes.get(self.next?)?;
        self.next = node.next;
        Some(&node.item)
    }
}
