use serde::{Deserialize, Serialize};

/// Book追加リクエスト。read_statusは入力境界で正規化済みのbool。
#[derive(Debug, Clone)]
pub struct AddBookRequest {
    pub title: String,
    pub author: String,
    pub year: i32,
    pub genre: String,
    pub read_status: bool,
}

/// 蔵書1冊分のレコード。永続化フォーマットはこの5フィールドのみ。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Book {
    title: String,
    author: String,
    year: i32,
    genre: String,
    read_status: bool,
}

impl Book {
    pub(crate) fn new(req: AddBookRequest) -> Self {
        Self {
            title: req.title,
            author: req.author,
            year: req.year,
            genre: req.genre,
            read_status: req.read_status,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn genre(&self) -> &str {
        &self.genre
    }

    pub fn is_read(&self) -> bool {
        self.read_status
    }

    /// タイトルの大文字小文字を無視した完全一致
    pub fn title_matches(&self, title: &str) -> bool {
        self.title.to_lowercase() == title.to_lowercase()
    }
}
