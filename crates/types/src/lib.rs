//! Memo Types - shared data model and host command surface
//!
//! This crate defines the memo/font data structures and the `MemoHost`
//! trait that every host backend (local file system, remote, test double)
//! implements.

mod host;
mod models;

pub use host::{MemoHost, PathPicker};
pub use models::{
    sort_by_recent, EditorFontSetting, FontFormat, InstalledFont, MemoFile, MemoMeta,
    MemoMetaPatch,
};
