use serde::{Deserialize, Serialize};

use crate::catalog::Book;
use crate::error::Result;
use crate::queue::Reservation;

/// Snapshot is the externally saved state of a [`crate::LibraryCatalog`].
///
/// On the wire it reads as:
///
/// ```json
/// {
///   "books": [{"id": 1, "title": "1984", "author": "George Orwell", "isAvailable": true}],
///   "reservations": [{"bookId": 1, "requesterName": "alice"}]
/// }
/// ```
///
/// Books are in ascending id order, reservations oldest first. Either
/// array may be missing from a saved document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub books: Vec<Book>,
    #[serde(default)]
    pub reservations: Vec<Reservation>,
}

impl Snapshot {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(text: &str) -> Result<Snapshot> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_snapshot_wire_names() {
        let snapshot = Snapshot {
            books: vec![Book::new(7, "Dune", "Frank Herbert")],
            reservations: vec![Reservation::new(7, "carol")],
        };
        let value: serde_json::Value = serde_json::from_str(&snapshot.to_json().unwrap()).unwrap();
        assert_eq!(value["books"][0]["isAvailable"], serde_json::json!(true));
        assert_eq!(value["books"][0]["id"], serde_json::json!(7));
        assert_eq!(value["reservations"][0]["bookId"], serde_json::json!(7));
        assert_eq!(value["reservations"][0]["requesterName"], serde_json::json!("carol"));
    }

    #[test]
    fn test_snapshot_missing_arrays() {
        let snapshot = Snapshot::from_json("{}").unwrap();
        assert_eq!(snapshot, Snapshot::default());

        let text = r#"{"books": [{"id": 3, "title": "Emma", "author": "Jane Austen", "isAvailable": false}]}"#;
        let snapshot = Snapshot::from_json(text).unwrap();
        assert_eq!(snapshot.books.len(), 1);
        assert!(!snapshot.books[0].is_available);
        assert!(snapshot.reservations.is_empty());
    }

    #[test]
    fn test_snapshot_bad_document() {
        match Snapshot::from_json("") {
            Err(Error::Json(_)) => (),
            res => panic!("unexpected {:?}", res),
        }
        match Snapshot::from_json(r#"{"books": [{"id": "one"}]}"#) {
            Err(Error::Json(_)) => (),
            res => panic!("unexpected {:?}", res),
        }
    }
}
