use serde::{Deserialize, Serialize};

use super::book::{AddBookRequest, Book};
use crate::domain::error::DomainError;

/// 検索対象フィールド
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Title,
    Author,
}

impl SearchField {
    /// "Title" / "Author" の完全一致のみ。それ以外はNone。
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Title" => Some(Self::Title),
            "Author" => Some(Self::Author),
            _ => None,
        }
    }

    fn value_of<'a>(&self, book: &'a Book) -> &'a str {
        match self {
            Self::Title => book.title(),
            Self::Author => book.author(),
        }
    }
}

/// 蔵書の集計値
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Statistics {
    pub total: usize,
    /// 既読率（%）。total == 0 のときは 0.0。
    pub percent_read: f64,
}

/// Catalog — 集約ルート。挿入順を保持するBookの列。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    books: Vec<Book>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// 末尾にBookを追加する。必須フィールドの検証に失敗した場合は変更しない。
    pub fn add(&mut self, req: AddBookRequest) -> Result<&Book, DomainError> {
        require("title", &req.title)?;
        require("author", &req.author)?;
        require("genre", &req.genre)?;

        self.books.push(Book::new(req));
        let last = self.books.len() - 1;
        Ok(&self.books[last])
    }

    /// タイトルが一致する（大文字小文字無視）Bookを全て取り除き、削除件数を返す。
    /// 一致なしはエラーではなく0件。
    pub fn remove(&mut self, title: &str) -> usize {
        let before = self.books.len();
        self.books.retain(|book| !book.title_matches(title));
        before - self.books.len()
    }

    /// 部分一致検索（大文字小文字無視）。空文字列は全件に一致する。
    pub fn search(&self, field: SearchField, value: &str) -> Vec<&Book> {
        let query = value.to_lowercase();
        self.books
            .iter()
            .filter(|book| field.value_of(book).to_lowercase().contains(&query))
            .collect()
    }

    /// フィールド名指定の検索。未対応のフィールド名は空の結果。
    pub fn search_by_name(&self, field: &str, value: &str) -> Vec<&Book> {
        match SearchField::from_name(field) {
            Some(field) => self.search(field, value),
            None => Vec::new(),
        }
    }

    pub fn statistics(&self) -> Statistics {
        let total = self.books.len();
        let read = self.books.iter().filter(|book| book.is_read()).count();
        let percent_read = if total > 0 {
            read as f64 / total as f64 * 100.0
        } else {
            0.0
        };
        Statistics {
            total,
            percent_read,
        }
    }
}

fn require(field: &'static str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::MissingField(field));
    }
    Ok(())
}
