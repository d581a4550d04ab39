//! Server-rendered pages. Every interpolated value goes through [`escape`].

use std::fmt::Write;

use models::{book, review, user};

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{}</title></head>\n<body>\n<h1>{}</h1>\n{}</body>\n</html>\n",
        escape(title),
        escape(title),
        body
    )
}

pub fn books_page(books: &[book::Model]) -> String {
    let mut body = String::from("<table>\n<tr><th>ID</th><th>Title</th><th>Author</th><th>Year</th></tr>\n");
    for b in books {
        let _ = writeln!(
            body,
            "<tr><td>{id}</td><td><a href=\"/books/{id}\">{}</a></td><td>{}</td><td>{}</td></tr>",
            escape(&b.title),
            escape(&b.author),
            b.year,
            id = b.id,
        );
    }
    body.push_str("</table>\n");
    page("Books", &body)
}

/// `reviews` is `None` when the review ledger could not be read.
pub fn book_page(book: &book::Model, reviews: Option<&[review::Model]>) -> String {
    let mut body = format!(
        "<p>Author: {}</p>\n<p>Year: {}</p>\n<h2>Reviews</h2>\n",
        escape(&book.author),
        book.year
    );
    match reviews {
        None => body.push_str("<p class=\"notice\">Reviews unavailable right now.</p>\n"),
        Some([]) => body.push_str("<p>No reviews yet.</p>\n"),
        Some(reviews) => {
            body.push_str("<table>\n<tr><th>Rating</th><th>Comment</th><th>Reviewer</th><th>Date</th></tr>\n");
            for r in reviews {
                let _ = writeln!(
                    body,
                    "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                    r.rating,
                    escape(&r.comment),
                    escape(&r.reviewer),
                    escape(&r.date)
                );
            }
            body.push_str("</table>\n");
        }
    }
    body.push_str("<p><a href=\"/books\">All books</a></p>\n");
    page(&book.title, &body)
}

pub fn users_page(users: &[user::Model]) -> String {
    let mut body = String::from("<table>\n<tr><th>ID</th><th>Username</th><th>Email</th></tr>\n");
    for u in users {
        let _ = writeln!(
            body,
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            u.id,
            escape(&u.username),
            escape(&u.email)
        );
    }
    body.push_str("</table>\n");
    page("Users", &body)
}

pub fn not_found_page(what: &str) -> String {
    page("Not Found", &format!("<p>{}</p>\n", escape(what)))
}
