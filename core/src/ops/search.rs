//! Search is plain in-memory filtering over already-fetched lists. Matching
//! is case-insensitive substring containment; a blank or whitespace-only
//! query matches everything.

use crate::domain::{Book, Event, Owner};

fn contains(haystack: Option<&str>, needle: &str) -> bool {
	haystack
		.map(|value| value.to_lowercase().contains(needle))
		.unwrap_or(false)
}

fn normalized(query: &str) -> Option<String> {
	let trimmed = query.trim();
	if trimmed.is_empty() {
		None
	} else {
		Some(trimmed.to_lowercase())
	}
}

/// Admin-side book search: title, author, ISBN, price string, or the linked
/// owner's name.
pub fn filter_books(books: Vec<Book>, query: &str) -> Vec<Book> {
	let Some(needle) = normalized(query) else {
		return books;
	};
	books
		.into_iter()
		.filter(|book| {
			contains(book.title.as_deref(), &needle)
				|| contains(book.author.as_deref(), &needle)
				|| contains(book.isbn.as_deref(), &needle)
				|| contains(book.price.as_deref(), &needle)
				|| book
					.owner
					.as_ref()
					.map(|owner| contains(owner.name.as_deref(), &needle))
					.unwrap_or(false)
		})
		.collect()
}

/// Public book search: title and price string only.
pub fn filter_books_public(books: Vec<Book>, query: &str) -> Vec<Book> {
	let Some(needle) = normalized(query) else {
		return books;
	};
	books
		.into_iter()
		.filter(|book| {
			contains(book.title.as_deref(), &needle) || contains(book.price.as_deref(), &needle)
		})
		.collect()
}

/// Owner search: name, location, bio, or any hobby label.
pub fn filter_owners(owners: Vec<Owner>, query: &str) -> Vec<Owner> {
	let Some(needle) = normalized(query) else {
		return owners;
	};
	owners
		.into_iter()
		.filter(|owner| {
			contains(owner.name.as_deref(), &needle)
				|| contains(owner.location.as_deref(), &needle)
				|| contains(owner.bio.as_deref(), &needle)
				|| owner
					.hobby
					.iter()
					.any(|hobby| contains(hobby.owner_hobby.as_deref(), &needle))
		})
		.collect()
}

/// Event search: name, location, or description.
pub fn filter_events(events: Vec<Event>, query: &str) -> Vec<Event> {
	let Some(needle) = normalized(query) else {
		return events;
	};
	events
		.into_iter()
		.filter(|event| {
			contains(Some(&event.name), &needle)
				|| contains(Some(&event.location), &needle)
				|| contains(Some(&event.description), &needle)
		})
		.collect()
}
