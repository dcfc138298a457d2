use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    #[serde(default)]
    pub id: Option<i64>,
    pub title: String,
    pub author: String,
}

impl Book {
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Book {
            id: None,
            title: title.into(),
            author: author.into(),
        }
    }

    pub fn with_id(self, id: i64) -> Self {
        Book { id: Some(id), ..self }
    }

    pub fn without_id(self) -> Self {
        Book { id: None, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_id_deserializes_as_none() {
        let book: Book = serde_json::from_str(r#"{"title":"test","author":"Ramesh"}"#).unwrap();
        assert_eq!(book, Book::new("test", "Ramesh"));
    }

    #[test]
    fn test_unsaved_book_serializes_null_id() {
        let json = serde_json::to_value(Book::new("Tony", "Stark")).unwrap();
        assert_eq!(json, serde_json::json!({"id": null, "title": "Tony", "author": "Stark"}));
    }

    #[test]
    fn test_with_id_keeps_fields() {
        let book = Book::new("Ram", "Jadhav").with_id(7);
        assert_eq!(book.id, Some(7));
        assert_eq!(book.title, "Ram");
        assert_eq!(book.without_id().id, None);
    }
}
