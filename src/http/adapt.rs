//! Client-specific response adaptation.
//!
//! Mobile clients receive a reshaped book payload: the legacy mobile app
//! expects the genre `"non-fiction"` as the numeric code `3`. Works on a
//! single book object or an array of books.

use serde_json::Value;

/// True when the user agent corresponds to a mobile device.
pub fn is_mobile_device(user_agent: &str) -> bool {
    user_agent.contains("Mobile")
}

/// Rewrite the genre field for mobile clients, on an object or an array.
pub fn adapt_book_payload(payload: &mut Value) {
    match payload {
        Value::Array(books) => {
            for book in books {
                adapt_genre(book);
            }
        }
        Value::Object(_) => adapt_genre(payload),
        _ => {}
    }
}

fn adapt_genre(book: &mut Value) {
    if let Some(genre) = book.get_mut("genre") {
        if genre == "non-fiction" {
            *genre = Value::from(3);
        }
    }
}
