pub mod delete;
pub mod folder;
pub mod font;
pub mod list;
pub mod new;
pub mod open;
pub mod rename;
pub mod status;
pub mod write;

use anyhow::{bail, Result};

use memo_types::MemoMeta;

use crate::store::MemoState;

/// 按路径或名称查找工作目录中的备忘录
///
/// 依次尝试：完整路径、名称精确匹配、名称大小写不敏感的唯一匹配。
pub fn resolve_memo(state: &MemoState, query: &str) -> Result<MemoMeta> {
    let Some(folder) = state.working_folder.as_deref() else {
        bail!("No folder is open. Use 'memo folder <PATH>' first");
    };

    let query = query.trim();
    let name = query.strip_suffix(".md").unwrap_or(query);

    if let Some(memo) = state
        .memos
        .iter()
        .find(|m| m.path == query || m.name == name)
    {
        return Ok(memo.clone());
    }

    let matches: Vec<&MemoMeta> = state
        .memos
        .iter()
        .filter(|m| m.name.eq_ignore_ascii_case(name))
        .collect();
    match matches.as_slice() {
        [memo] => Ok((*memo).clone()),
        [] => bail!("No memo named \"{}\" in {}", name, folder),
        _ => bail!(
            "\"{}\" matches {} memos, use the full path instead",
            name,
            matches.len()
        ),
    }
}
