//! Memo Local - file-system host backend
//!
//! This crate implements the MemoHost trait on top of `tokio::fs`:
//! memos are plain `.md` files inside the working folder, installed
//! fonts are copied into an application-owned directory.

mod client;
mod error;
mod font_store;
mod memo_fs;

// Re-export the client (implements MemoHost)
pub use client::LocalHostClient;
pub use error::LocalHostError;
pub use font_store::FontStore;
