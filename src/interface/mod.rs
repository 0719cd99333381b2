pub mod mcp;
pub mod render;
