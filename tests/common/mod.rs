//! Shared test harness for integration tests.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};

use library_mcp::application::service::LibraryService;
use library_mcp::domain::model::book::AddBookRequest;
use library_mcp::domain::model::catalog::Catalog;
use library_mcp::domain::repository::{CatalogRepository, RepositoryError};

// =============================================================================
// InMemoryRepo — テスト用リポジトリ
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum InMemoryError {
    #[error("in-memory store is corrupt")]
    Corrupt,
    #[error("in-memory store rejected the write")]
    WriteRejected,
}

impl RepositoryError for InMemoryError {
    fn is_corrupt(&self) -> bool {
        matches!(self, Self::Corrupt)
    }
}

/// ファイルI/O不要のインメモリリポジトリ。JSON文字列として保持する。
pub struct InMemoryRepo {
    store: RefCell<Option<String>>,
    saves: Cell<usize>,
    fail_writes: bool,
}

impl InMemoryRepo {
    pub fn new() -> Self {
        Self {
            store: RefCell::new(None),
            saves: Cell::new(0),
            fail_writes: false,
        }
    }

    /// 読み込み時に解釈できない内容を持つリポジトリ。
    pub fn with_raw(raw: &str) -> Self {
        let repo = Self::new();
        *repo.store.borrow_mut() = Some(raw.to_string());
        repo
    }

    /// 書き込みが常に失敗するリポジトリ。
    pub fn read_only() -> Self {
        Self {
            fail_writes: true,
            ..Self::new()
        }
    }

    pub fn save_count(&self) -> usize {
        self.saves.get()
    }

    pub fn raw(&self) -> Option<String> {
        self.store.borrow().clone()
    }
}

impl CatalogRepository for InMemoryRepo {
    type Error = InMemoryError;

    fn load(&self) -> Result<Catalog, Self::Error> {
        match self.store.borrow().as_deref() {
            Some(json) => serde_json::from_str(json).map_err(|_| InMemoryError::Corrupt),
            None => Ok(Catalog::new()),
        }
    }

    fn save(&self, catalog: &Catalog) -> Result<(), Self::Error> {
        if self.fail_writes {
            return Err(InMemoryError::WriteRejected);
        }
        let json = serde_json::to_string(catalog).unwrap();
        *self.store.borrow_mut() = Some(json);
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}

// =============================================================================
// TestLibrary — テスト用Catalog作成ヘルパー
// =============================================================================

pub fn book(title: &str, author: &str, year: i32, genre: &str, read: bool) -> AddBookRequest {
    AddBookRequest {
        title: title.into(),
        author: author.into(),
        year,
        genre: genre.into(),
        read_status: read,
    }
}

pub struct TestLibrary;

impl TestLibrary {
    /// 標準的なテスト用Catalog:
    /// ```text
    /// 1. Dune / Frank Herbert / 1965 / SciFi / read
    /// 2. Emma / Jane Austen / 1815 / Romance / unread
    /// 3. Dune Messiah / Frank Herbert / 1969 / SciFi / unread
    /// 4. The Hobbit / J.R.R. Tolkien / 1937 / Fantasy / read
    /// ```
    pub fn standard() -> Catalog {
        let mut catalog = Catalog::new();
        catalog
            .add(book("Dune", "Frank Herbert", 1965, "SciFi", true))
            .unwrap();
        catalog
            .add(book("Emma", "Jane Austen", 1815, "Romance", false))
            .unwrap();
        catalog
            .add(book("Dune Messiah", "Frank Herbert", 1969, "SciFi", false))
            .unwrap();
        catalog
            .add(book("The Hobbit", "J.R.R. Tolkien", 1937, "Fantasy", true))
            .unwrap();
        catalog
    }

    /// InMemoryRepoにCatalogを保存してLibraryServiceを開く。
    pub fn service_with(catalog: &Catalog) -> LibraryService<InMemoryRepo> {
        let repo = InMemoryRepo::new();
        repo.save(catalog).unwrap();
        LibraryService::open(repo).unwrap()
    }
}

// =============================================================================
// Assertion helpers
// =============================================================================

/// 結果がErrで、メッセージに指定文字列を含むことをassert。
pub fn assert_error_contains<T: std::fmt::Debug>(
    result: Result<T, impl std::fmt::Display>,
    expected: &str,
) {
    match result {
        Err(e) => {
            let msg = e.to_string();
            assert!(
                msg.contains(expected),
                "Expected error containing '{expected}', got: '{msg}'"
            );
        }
        Ok(v) => panic!("Expected error containing '{expected}', got Ok({v:?})"),
    }
}
