use anyhow::Result;
use console::Style;
use dialoguer::Confirm;

use memo_types::{EditorFontSetting, InstalledFont, MemoMeta};

use crate::toast::{Toast, ToastKind};

/// 命令行输出格式化工具
/// 提供统一的 Cargo 风格输出
pub struct Output {
    green: Style,
    bold: Style,
    dim: Style,
}

impl Output {
    pub fn new() -> Self {
        Self {
            green: Style::new().green().bold(),
            bold: Style::new().bold(),
            dim: Style::new().dim(),
        }
    }

    /// 显示状态消息
    /// 格式: "     Opening notes/todo.md"（动词右对齐到 12 字符）
    pub fn status(&self, action: &str, target: &str) {
        eprintln!("{:>12} {}", self.green.apply_to(action), target);
    }

    /// 显示工作目录信息
    /// 格式: "      Folder /path/to/notes (12 memos)"
    /// 自动在后面添加空行
    pub fn folder_info(&self, folder: &str, memo_count: usize) {
        eprintln!(
            "{:>12} {} {}",
            self.green.apply_to("Folder"),
            folder,
            self.dim.apply_to(format!("({} memos)", memo_count))
        );
        eprintln!();
    }

    /// 显示备忘录列表（最新的在前）
    /// 格式: "* todo (2024-03-09 07:05)"，`*` 标记当前选中项
    pub fn memo_list(&self, memos: &[MemoMeta], selected: Option<&str>) {
        for memo in memos {
            let marker = if selected == Some(memo.path.as_str()) {
                self.green.apply_to("*").to_string()
            } else {
                " ".to_string()
            };
            println!(
                "{} {} {}",
                marker,
                self.bold.apply_to(&memo.name),
                self.dim.apply_to(format!("({})", format_time(memo.modified_at)))
            );
        }
    }

    /// 显示备忘录正文
    pub fn memo_body(&self, memo: &MemoMeta, body: &str) {
        println!(
            "{} {}",
            self.bold.apply_to(&memo.name),
            self.dim.apply_to(format!("({})", format_time(memo.modified_at)))
        );
        println!();
        println!("{}", body);
    }

    /// 显示已安装的字体，标出正在使用的那个
    pub fn font_list(&self, fonts: &[InstalledFont], active: &EditorFontSetting) {
        for font in fonts {
            let marker = if active.uses_font(&font.id) {
                self.green.apply_to("*").to_string()
            } else {
                " ".to_string()
            };
            println!(
                "{} {} {} {}",
                marker,
                self.bold.apply_to(&font.label),
                self.dim.apply_to(&font.id),
                self.dim.apply_to(format!("({})", font.format))
            );
        }
    }

    /// 输出一条提示消息
    pub fn toast(&self, toast: &Toast) {
        match toast.kind {
            ToastKind::Success => self.status("Done", &toast.message),
            ToastKind::Info => self.note(&toast.message),
            ToastKind::Error => self.error(&toast.message),
        }
    }

    /// 显示完成消息（简单版本）
    /// 格式: "    Finished action"
    pub fn finish(&self, action: &str) {
        eprintln!("{:>12} {}", self.green.apply_to("Finished"), action);
    }

    /// 显示注意事项（右对齐）
    pub fn note(&self, message: &str) {
        eprintln!("{:>12} {}", self.dim.apply_to("Note"), message);
    }

    /// 显示警告（黄色，右对齐）
    /// 自动在前面添加空行
    pub fn warning(&self, message: &str) {
        eprintln!();
        eprintln!(
            "{:>12} {}",
            Style::new().yellow().bold().apply_to("Warning"),
            message
        );
        eprintln!();
    }

    /// 显示错误（红色，右对齐）
    pub fn error(&self, message: &str) {
        eprintln!(
            "{:>12} {}",
            Style::new().red().bold().apply_to("Error"),
            message
        );
    }

    /// 显示提示消息（标准输出，右对齐）
    pub fn info(&self, message: &str) {
        println!("{:>12} {}", "", message);
    }

    /// 显示确认提示，返回用户是否同意
    pub fn confirm(&self, prompt: &str) -> Result<bool> {
        let confirmed = Confirm::new()
            .with_prompt(format!("{:>12} {}", "", prompt))
            .default(false)
            .interact()?;
        Ok(confirmed)
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

/// 毫秒时间戳格式化为本地时间
pub fn format_time(millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(millis)
        .map(|dt| {
            dt.with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M")
                .to_string()
        })
        .unwrap_or_else(|| "N/A".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time_out_of_range() {
        assert_eq!(format_time(i64::MAX), "N/A");
    }

    #[test]
    fn test_format_time_shape() {
        let formatted = format_time(1_700_000_000_000);
        assert_eq!(formatted.len(), "2023-11-14 22:13".len());
    }
}
