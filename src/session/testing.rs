//! 测试用的内存宿主

use anyhow::{bail, Result};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use memo_types::{FontFormat, InstalledFont, MemoFile, MemoHost, MemoMeta};

#[derive(Default)]
struct MockState {
    memos: BTreeMap<String, MemoFile>,
    fonts: HashMap<String, InstalledFont>,
    picked_folder: Option<String>,
    picked_font: Option<String>,
    read_delays: HashMap<String, Duration>,
    save_delay: Option<Duration>,
    failing: HashSet<&'static str>,
    saves: Vec<(String, String)>,
    clock: i64,
}

/// 可编排延迟与失败的内存宿主
pub struct MockHost {
    state: Mutex<MockState>,
}

impl MockHost {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState {
                clock: 1_000,
                ..MockState::default()
            }),
        }
    }

    pub fn add_memo(&self, folder: &str, name: &str, modified_at: i64, content: &str) {
        let meta = MemoMeta {
            path: format!("{}/{}.md", folder, name),
            name: name.to_string(),
            created_at: modified_at,
            modified_at,
        };
        let mut state = self.state.lock().unwrap();
        state
            .memos
            .insert(meta.path.clone(), MemoFile::new(meta, content));
    }

    /// 模拟其他程序删除了文件
    pub fn remove_external(&self, path: &str) {
        self.state.lock().unwrap().memos.remove(path);
    }

    pub fn set_picked_folder(&self, folder: Option<&str>) {
        self.state.lock().unwrap().picked_folder = folder.map(str::to_string);
    }

    pub fn set_picked_font(&self, path: Option<&str>) {
        self.state.lock().unwrap().picked_font = path.map(str::to_string);
    }

    pub fn set_read_delay(&self, path: &str, delay: Duration) {
        self.state
            .lock()
            .unwrap()
            .read_delays
            .insert(path.to_string(), delay);
    }

    pub fn set_save_delay(&self, delay: Duration) {
        self.state.lock().unwrap().save_delay = Some(delay);
    }

    /// 让指定操作之后的调用失败
    pub fn fail(&self, op: &'static str) {
        self.state.lock().unwrap().failing.insert(op);
    }

    pub fn recover(&self, op: &'static str) {
        self.state.lock().unwrap().failing.remove(op);
    }

    pub fn saves(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().saves.clone()
    }

    pub fn content(&self, path: &str) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .memos
            .get(path)
            .map(|m| m.content.clone())
    }

    fn check(&self, op: &'static str) -> Result<()> {
        if self.state.lock().unwrap().failing.contains(op) {
            bail!("{} failed", op);
        }
        Ok(())
    }

    fn tick(state: &mut MockState) -> i64 {
        state.clock += 1;
        state.clock
    }
}

#[async_trait]
impl MemoHost for MockHost {
    async fn select_folder(&self) -> Result<Option<String>> {
        self.check("select_folder")?;
        Ok(self.state.lock().unwrap().picked_folder.clone())
    }

    async fn list_memos(&self, folder: &str) -> Result<Vec<MemoMeta>> {
        self.check("list_memos")?;
        let prefix = format!("{}/", folder);
        let state = self.state.lock().unwrap();
        Ok(state
            .memos
            .values()
            .filter(|m| m.path().starts_with(&prefix))
            .map(|m| m.meta.clone())
            .collect())
    }

    async fn read_memo(&self, path: &str, _folder: &str) -> Result<MemoFile> {
        let delay = self.state.lock().unwrap().read_delays.get(path).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.check("read_memo")?;

        match self.state.lock().unwrap().memos.get(path) {
            Some(memo) => Ok(memo.clone()),
            None => bail!("File not found: {}", path),
        }
    }

    async fn save_memo(&self, path: &str, content: &str, _folder: &str) -> Result<MemoMeta> {
        let delay = self.state.lock().unwrap().save_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.check("save_memo")?;

        let mut state = self.state.lock().unwrap();
        let now = Self::tick(&mut state);
        state.saves.push((path.to_string(), content.to_string()));

        let memo = match state.memos.get_mut(path) {
            Some(memo) => memo,
            None => bail!("File not found: {}", path),
        };
        memo.content = content.to_string();
        memo.meta.modified_at = now;
        Ok(memo.meta.clone())
    }

    async fn create_memo(&self, folder: &str, name: &str) -> Result<MemoMeta> {
        self.check("create_memo")?;

        let mut state = self.state.lock().unwrap();
        let now = Self::tick(&mut state);
        let mut candidate = name.to_string();
        let mut counter = 1;
        while state
            .memos
            .contains_key(&format!("{}/{}.md", folder, candidate))
        {
            candidate = format!("{}-{}", name, counter);
            counter += 1;
        }

        let meta = MemoMeta {
            path: format!("{}/{}.md", folder, candidate),
            name: candidate,
            created_at: now,
            modified_at: now,
        };
        state
            .memos
            .insert(meta.path.clone(), MemoFile::new(meta.clone(), ""));
        Ok(meta)
    }

    async fn delete_memo(&self, path: &str, _folder: &str) -> Result<()> {
        self.check("delete_memo")?;
        match self.state.lock().unwrap().memos.remove(path) {
            Some(_) => Ok(()),
            None => bail!("File not found: {}", path),
        }
    }

    async fn rename_memo(&self, path: &str, new_name: &str, folder: &str) -> Result<MemoMeta> {
        self.check("rename_memo")?;

        let mut state = self.state.lock().unwrap();
        let Some(mut memo) = state.memos.remove(path) else {
            bail!("File not found: {}", path);
        };
        memo.meta.path = format!("{}/{}.md", folder, new_name);
        memo.meta.name = new_name.to_string();
        let meta = memo.meta.clone();
        state.memos.insert(meta.path.clone(), memo);
        Ok(meta)
    }

    async fn pick_font_file(&self) -> Result<Option<String>> {
        self.check("pick_font_file")?;
        Ok(self.state.lock().unwrap().picked_font.clone())
    }

    async fn install_font(&self, path: &str, label: &str) -> Result<InstalledFont> {
        self.check("install_font")?;

        let ext = path.rsplit('.').next().unwrap_or_default();
        let Some(format) = FontFormat::from_extension(ext) else {
            bail!("Unsupported font format: {}", ext);
        };

        let mut state = self.state.lock().unwrap();
        let now = Self::tick(&mut state);
        let id = format!("font-{}", now);
        let font = InstalledFont {
            filename: format!("{}.{}", id, format),
            id: id.clone(),
            label: label.to_string(),
            format,
            installed_at: now,
        };
        state.fonts.insert(id, font.clone());
        Ok(font)
    }

    async fn get_installed_font_path(&self, id: &str, format: FontFormat) -> Result<String> {
        self.check("get_installed_font_path")?;
        if !self.state.lock().unwrap().fonts.contains_key(id) {
            bail!("Font not found: {}", id);
        }
        Ok(format!("/fonts/{}.{}", id, format))
    }

    async fn delete_installed_font(&self, id: &str, _format: FontFormat) -> Result<()> {
        self.check("delete_installed_font")?;
        self.state.lock().unwrap().fonts.remove(id);
        Ok(())
    }
}
