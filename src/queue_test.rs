use crate::queue::{Reservation, ReservationQueue};

#[test]
fn test_empty() {
    let mut queue = ReservationQueue::new();
    assert!(queue.is_empty());
    assert_eq!(queue.len(), 0);
    assert_eq!(queue.front(), None);
    assert_eq!(queue.dequeue(), None);
    assert!(queue.iter().next().is_none());
    assert!(queue.validate().is_ok());
}

#[test]
fn test_fifo() {
    let mut queue = ReservationQueue::new();
    queue.enqueue(1, "k1");
    queue.enqueue(9, "k2");
    queue.enqueue(1, "k3");
    assert_eq!(queue.len(), 3);
    assert!(queue.validate().is_ok());
    assert_eq!(queue.front(), Some(&Reservation::new(1, "k1")));

    let names: Vec<&str> = queue.iter().map(|r| r.requester_name.as_str()).collect();
    assert_eq!(names, vec!["k1", "k2", "k3"]);

    assert_eq!(queue.dequeue(), Some(Reservation::new(1, "k1")));
    assert_eq!(queue.dequeue(), Some(Reservation::new(9, "k2")));
    assert!(queue.validate().is_ok());
    assert_eq!(queue.dequeue(), Some(Reservation::new(1, "k3")));
    assert_eq!(queue.dequeue(), None);
    assert!(queue.is_empty());
    assert!(queue.validate().is_ok());
}

#[test]
fn test_refill_after_drain() {
    let mut queue = ReservationQueue::new();
    queue.enqueue(1, "a");
    assert!(queue.dequeue().is_some());
    assert!(queue.is_empty());

    // rear must have been reset, otherwise this node would be lost.
    queue.enqueue(2, "b");
    queue.enqueue(3, "c");
    assert!(queue.validate().is_ok());
    assert_eq!(queue.dequeue().map(|r| r.book_id), Some(2));
    assert_eq!(queue.dequeue().map(|r| r.book_id), Some(3));
}

#[test]
fn test_interleaved() {
    let mut queue = ReservationQueue::new();
    let mut model = std::collections::VecDeque::new();
    for i in 0..1000_u64 {
        let item = Reservation::new(i, format!("user-{}", i));
        queue.push(item.clone());
        model.push_back(item);
        if i % 3 == 0 {
            assert_eq!(queue.dequeue(), model.pop_front());
        }
        assert!(queue.validate().is_ok());
    }
    assert_eq!(queue.len(), model.len());
    let items: Vec<Reservation> = queue.iter().cloned().collect();
    let refs: Vec<Reservation> = model.iter().cloned().collect();
    assert_eq!(items, refs);
}

#[test]
fn test_collect_and_clear() {
    let items = vec![Reservation::new(4, "x"), Reservation::new(5, "y")];
    let mut queue: ReservationQueue = items.clone().into_iter().collect();
    assert_eq!(queue.iter().cloned().collect::<Vec<_>>(), items);

    queue.clear();
    assert!(queue.is_empty());
    assert!(queue.validate().is_ok());
    queue.extend(items.clone());
    assert_eq!(queue.len(), 2);
    assert_eq!(queue.dequeue(), Some(items[0].clone()));
}
