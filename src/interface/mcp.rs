//! MCP Server for library-mcp
//!
//! MCP Protocol (stdio) <-> application::LibraryService
//!
//! 6 tools: add_book, remove_book, search_books, list_books, statistics, save_library

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::Context;
use rmcp::{
    handler::server::{tool::ToolCallContext, tool::ToolRouter, wrapper::Parameters},
    model::{
        CallToolRequestParams, CallToolResult, Content, Implementation, ListToolsResult,
        PaginatedRequestParams, ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
    transport::stdio,
    ErrorData as McpError, ServerHandler, ServiceExt,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::application::error::AppError;
use crate::application::service::LibraryService;
use crate::domain::error::DomainError;
use crate::domain::model::book::AddBookRequest;
use crate::domain::model::input::{parse_read_status, parse_year, YearRange};
use crate::infra::json_store::JsonCatalogRepository;

use super::render;

// =============================================================================
// Public entry point
// =============================================================================

/// MCP Serverを起動する。library_pathは蔵書のJSONファイル。
/// 終了時に蔵書を保存する。
pub async fn run(library_path: PathBuf) -> anyhow::Result<()> {
    let session = LibraryService::open(JsonCatalogRepository::new(&library_path))
        .with_context(|| format!("failed to open library {}", library_path.display()))?;
    tracing::info!(path = %library_path.display(), "serving library over stdio");

    let server = LibraryMcpServer::new(session, YearRange::default());
    let running = server.clone().serve(stdio()).await?;
    // 通信エラーで終了した場合も保存してからエラーを返す
    let waited = running.waiting().await;

    server.save_on_exit()?;
    waited?;
    Ok(())
}

// =============================================================================
// MCP Server
// =============================================================================

type Session = LibraryService<JsonCatalogRepository>;

#[derive(Clone)]
struct LibraryMcpServer {
    session: Arc<Mutex<Session>>,
    year_range: YearRange,
    tool_router: ToolRouter<Self>,
}

impl LibraryMcpServer {
    fn new(session: Session, year_range: YearRange) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            year_range,
            tool_router: Self::tool_router(),
        }
    }

    fn session(&self) -> Result<MutexGuard<'_, Session>, McpError> {
        self.session
            .lock()
            .map_err(|_| McpError::internal_error("Lock poisoned", None))
    }

    fn save_on_exit(&self) -> anyhow::Result<()> {
        self.session()
            .map_err(|e| anyhow::anyhow!(e.message.to_string()))?
            .save()
            .context("failed to save library on exit")?;
        tracing::info!("library saved, shutting down");
        Ok(())
    }

    fn to_mcp_error(e: AppError) -> McpError {
        match e {
            AppError::InvalidInput(_) => McpError::invalid_params(format!("{e}"), None),
            other => McpError::internal_error(format!("{other}"), None),
        }
    }

    // --- Tool本体（同期処理。テストから直接呼ぶ） ---

    fn do_add_book(&self, req: McpAddBookRequest) -> Result<String, McpError> {
        require_text("title", &req.title)?;
        require_text("author", &req.author)?;
        require_text("genre", &req.genre)?;

        let year = req
            .year
            .resolve(self.year_range)
            .map_err(|e| Self::to_mcp_error(e.into()))?;

        let book = self
            .session()?
            .add_book(AddBookRequest {
                title: req.title,
                author: req.author,
                year,
                genre: req.genre,
                read_status: parse_read_status(&req.read_status),
            })
            .map_err(Self::to_mcp_error)?;

        Ok(format!("'{}' added successfully!", book.title()))
    }

    fn do_remove_book(&self, req: McpRemoveBookRequest) -> Result<String, McpError> {
        require_text("title", &req.title)?;

        let removed = self
            .session()?
            .remove_book(&req.title)
            .map_err(Self::to_mcp_error)?;

        Ok(match removed {
            0 => format!("No book titled '{}' in the library.", req.title),
            1 => format!("'{}' removed successfully!", req.title),
            n => format!("'{}' removed successfully! ({n} books)", req.title),
        })
    }

    fn do_search_books(&self, req: McpSearchRequest) -> Result<String, McpError> {
        require_text("value", &req.value)?;

        let session = self.session()?;
        let results = session.search_by_name(&req.search_by, &req.value);
        Ok(render::format_search_results(&results))
    }

    fn do_list_books(&self) -> Result<String, McpError> {
        let session = self.session()?;
        Ok(render::format_library(session.books()))
    }

    fn do_statistics(&self) -> Result<String, McpError> {
        let stats = self.session()?.statistics();
        Ok(render::format_statistics(&stats))
    }

    fn do_save_library(&self) -> Result<String, McpError> {
        self.session()?.save().map_err(Self::to_mcp_error)?;
        Ok("Library saved successfully!".to_string())
    }
}

// =============================================================================
// ServerHandler impl
// =============================================================================

impl ServerHandler for LibraryMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "library-mcp".to_string(),
                title: Some("Library MCP — Personal Library Manager".to_string()),
                description: Some(
                    "Track the books you own: add, remove, search, list, and see how many you've read."
                        .to_string(),
                ),
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Personal library manager.\n\
                 \n\
                 1. `add_book`: title, author, year, genre, and whether it has been read (yes/no). \
                 Every change is saved to the library file immediately.\n\
                 2. `remove_book`: removes every book with that title (case-insensitive).\n\
                 3. `search_books`: search by Title or Author (case-insensitive substring).\n\
                 4. `list_books`: the full library in insertion order.\n\
                 5. `statistics`: total books and percentage read.\n\
                 6. `save_library`: save explicitly before leaving."
                    .to_string(),
            ),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            tools: self.tool_router.list_all(),
            next_cursor: None,
            meta: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let tool_ctx = ToolCallContext::new(self, request, context);
        self.tool_router.call(tool_ctx).await
    }
}

// =============================================================================
// Request types
// =============================================================================

/// フォーム入力相当の必須チェック。
fn require_text(field: &str, value: &str) -> Result<(), McpError> {
    if value.trim().is_empty() {
        return Err(McpError::invalid_params(
            format!("{field} must not be empty"),
            None,
        ));
    }
    Ok(())
}

/// 年は数値でも文字列でも受け付ける。
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
enum McpYear {
    Number(i64),
    Text(String),
}

impl McpYear {
    fn resolve(&self, range: YearRange) -> Result<i32, DomainError> {
        let year = match self {
            Self::Number(n) => *n,
            Self::Text(s) => parse_year(s)?,
        };
        range.check(year)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpAddBookRequest {
    #[schemars(description = "Book title (required)")]
    pub title: String,
    #[schemars(description = "Author (required)")]
    pub author: String,
    #[schemars(description = "Publication year, 1000-2100 (number or numeric text)")]
    pub year: McpYear,
    #[schemars(description = "Genre (required)")]
    pub genre: String,
    #[schemars(description = "Have you read it? 'yes' or 'no'")]
    pub read_status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpRemoveBookRequest {
    #[schemars(description = "Title of the book(s) to remove (case-insensitive exact match)")]
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpSearchRequest {
    #[schemars(description = "Field to search: 'Title' or 'Author'")]
    pub search_by: String,
    #[schemars(description = "Text to look for (case-insensitive substring)")]
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpEmptyRequest {}

// =============================================================================
// Tool implementations
// =============================================================================

#[tool_router]
impl LibraryMcpServer {
    #[tool(
        name = "add_book",
        description = "Add a new book to the library and save it. read_status is 'yes' or 'no'.",
        annotations(
            read_only_hint = false,
            destructive_hint = false,
            idempotent_hint = false,
            open_world_hint = false
        )
    )]
    async fn add_book(
        &self,
        Parameters(req): Parameters<McpAddBookRequest>,
    ) -> Result<CallToolResult, McpError> {
        let output = self.do_add_book(req)?;
        Ok(CallToolResult::success(vec![Content::text(output)]))
    }

    #[tool(
        name = "remove_book",
        description = "Remove every book whose title matches (case-insensitive) and save. Removing a title that is not in the library changes nothing.",
        annotations(
            read_only_hint = false,
            destructive_hint = true,
            idempotent_hint = true,
            open_world_hint = false
        )
    )]
    async fn remove_book(
        &self,
        Parameters(req): Parameters<McpRemoveBookRequest>,
    ) -> Result<CallToolResult, McpError> {
        let output = self.do_remove_book(req)?;
        Ok(CallToolResult::success(vec![Content::text(output)]))
    }

    #[tool(
        name = "search_books",
        description = "Search books by Title or Author (case-insensitive substring match). search_by must be exactly 'Title' or 'Author'; any other value finds nothing.",
        annotations(
            read_only_hint = true,
            destructive_hint = false,
            open_world_hint = false
        )
    )]
    async fn search_books(
        &self,
        Parameters(req): Parameters<McpSearchRequest>,
    ) -> Result<CallToolResult, McpError> {
        let output = self.do_search_books(req)?;
        Ok(CallToolResult::success(vec![Content::text(output)]))
    }

    #[tool(
        name = "list_books",
        description = "Display all books in the library, numbered in insertion order.",
        annotations(
            read_only_hint = true,
            destructive_hint = false,
            open_world_hint = false
        )
    )]
    async fn list_books(
        &self,
        #[allow(unused_variables)] Parameters(_req): Parameters<McpEmptyRequest>,
    ) -> Result<CallToolResult, McpError> {
        let output = self.do_list_books()?;
        Ok(CallToolResult::success(vec![Content::text(output)]))
    }

    #[tool(
        name = "statistics",
        description = "Show the total number of books and the percentage marked as read.",
        annotations(
            read_only_hint = true,
            destructive_hint = false,
            open_world_hint = false
        )
    )]
    async fn statistics(
        &self,
        #[allow(unused_variables)] Parameters(_req): Parameters<McpEmptyRequest>,
    ) -> Result<CallToolResult, McpError> {
        let output = self.do_statistics()?;
        Ok(CallToolResult::success(vec![Content::text(output)]))
    }

    #[tool(
        name = "save_library",
        description = "Save the library file explicitly.",
        annotations(
            read_only_hint = false,
            destructive_hint = false,
            idempotent_hint = true,
            open_world_hint = false
        )
    )]
    async fn save_library(
        &self,
        #[allow(unused_variables)] Parameters(_req): Parameters<McpEmptyRequest>,
    ) -> Result<CallToolResult, McpError> {
        let output = self.do_save_library()?;
        Ok(CallToolResult::success(vec![Content::text(output)]))
    }
}

// =============================================================================
// Tests
// =============================================================================
