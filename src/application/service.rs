use crate::domain::model::book::{AddBookRequest, Book};
use crate::domain::model::catalog::{Catalog, SearchField, Statistics};
use crate::domain::repository::CatalogRepository;

use super::error::AppError;

/// 1セッション分の蔵書操作。
/// open時に一度だけloadし、変更操作のたびにsaveする。
pub struct LibraryService<R: CatalogRepository> {
    repo: R,
    catalog: Catalog,
}

impl<R: CatalogRepository> LibraryService<R> {
    /// Storeから蔵書を読み込んでセッションを開始する。
    pub fn open(repo: R) -> Result<Self, AppError> {
        let catalog = repo.load().map_err(AppError::from_store)?;
        tracing::info!(books = catalog.len(), "library opened");
        Ok(Self { repo, catalog })
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn books(&self) -> &[Book] {
        self.catalog.books()
    }

    /// Bookを追加して永続化する。入力不正の場合は何も書き込まない。
    pub fn add_book(&mut self, req: AddBookRequest) -> Result<Book, AppError> {
        let book = self.catalog.add(req)?.clone();
        tracing::info!(title = book.title(), "book added");
        self.persist()?;
        Ok(book)
    }

    /// タイトル一致のBookを削除して永続化する。削除件数を返す（0件もエラーではない）。
    pub fn remove_book(&mut self, title: &str) -> Result<usize, AppError> {
        let removed = self.catalog.remove(title);
        tracing::info!(title, removed, "books removed");
        self.persist()?;
        Ok(removed)
    }

    pub fn search(&self, field: SearchField, value: &str) -> Vec<&Book> {
        self.catalog.search(field, value)
    }

    /// フィールド名指定の検索。未対応のフィールド名は空の結果。
    pub fn search_by_name(&self, field: &str, value: &str) -> Vec<&Book> {
        self.catalog.search_by_name(field, value)
    }

    pub fn statistics(&self) -> Statistics {
        self.catalog.statistics()
    }

    /// 現在の蔵書を明示的に保存する。
    pub fn save(&self) -> Result<(), AppError> {
        self.persist()
    }

    // --- private ---

    fn persist(&self) -> Result<(), AppError> {
        self.repo.save(&self.catalog).map_err(|e| {
            tracing::error!(error = %e, "failed to save library");
            AppError::from_store(e)
        })
    }
}
