use super::model::catalog::Catalog;

/// Store実装のエラー。破損データとI/O障害を区別できること。
pub trait RepositoryError: std::error::Error + Send + Sync + 'static {
    /// 保存先は存在するが、Bookの列として解釈できない。
    fn is_corrupt(&self) -> bool;
}

/// 永続化の抽象。Infra層が実装する。
pub trait CatalogRepository {
    type Error: RepositoryError;

    /// 保存先が存在しなければ空のCatalogを返す。
    fn load(&self) -> Result<Catalog, Self::Error>;
    /// Catalog全体で保存先を置き換える（追記ではない）。
    fn save(&self, catalog: &Catalog) -> Result<(), Self::Error>;
}
