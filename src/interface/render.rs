//! 表示用テキスト整形。Coreは整形を行わないため、ここで一括して扱う。

use crate::domain::model::book::Book;
use crate::domain::model::catalog::Statistics;

/// "Title by Author (Year) - Genre - Read|Unread"
pub fn format_book_line(book: &Book) -> String {
    format!(
        "{} by {} ({}) - {} - {}",
        book.title(),
        book.author(),
        book.year(),
        book.genre(),
        if book.is_read() { "Read" } else { "Unread" }
    )
}

/// 全件を1始まりの番号付きで整形する。
pub fn format_library(books: &[Book]) -> String {
    if books.is_empty() {
        return "Library is empty.".to_string();
    }
    let mut output = format!("# Your Library ({} books)\n\n", books.len());
    for (i, book) in books.iter().enumerate() {
        output.push_str(&format!("{}. {}\n", i + 1, format_book_line(book)));
    }
    output
}

pub fn format_search_results(results: &[&Book]) -> String {
    if results.is_empty() {
        return "No matching books found.".to_string();
    }
    let mut output = String::new();
    for book in results {
        output.push_str(&format_book_line(book));
        output.push('\n');
    }
    output
}

pub fn format_statistics(stats: &Statistics) -> String {
    format!(
        "Total Books: {}\nBooks Read: {:.2}%",
        stats.total, stats.percent_read
    )
}
