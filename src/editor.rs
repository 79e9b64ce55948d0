use console::Style;
use pulldown_cmark::{Event, Parser, Tag, TagEnd};
use serde::{Deserialize, Serialize};

use crate::store::MemoState;

/// 编辑器模式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorMode {
    /// Markdown 渲染视图
    #[default]
    Rich,
    /// 原始文本
    Raw,
}

/// 一个编辑器实例，以备忘录路径为 key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorSession {
    pub key: String,
    pub name: String,
    pub content: String,
    pub mode: EditorMode,
    /// 每次重新挂载递增
    pub generation: u64,
}

/// 编辑器发出的内容变化，携带产生它的实例 key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorChange {
    pub key: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorView {
    Placeholder,
    Editing(EditorSession),
}

impl EditorSession {
    pub fn change(&self, content: impl Into<String>) -> EditorChange {
        EditorChange {
            key: self.key.clone(),
            content: content.into(),
        }
    }

    pub fn render(&self) -> String {
        match self.mode {
            EditorMode::Rich => render_markdown(&self.content),
            EditorMode::Raw => self.content.clone(),
        }
    }
}

/// 编辑器适配层
///
/// 从状态推导视图；备忘录身份变化时换一个新实例，避免旧实例的内部状态
/// 泄漏到下一篇备忘录。
#[derive(Debug)]
pub struct EditorAdapter {
    mode: EditorMode,
    mounted: Option<String>,
    generation: u64,
}

impl EditorAdapter {
    pub fn new(mode: EditorMode) -> Self {
        Self {
            mode,
            mounted: None,
            generation: 0,
        }
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: EditorMode) {
        if self.mode != mode {
            self.mode = mode;
            // 切换模式同样需要新实例
            self.mounted = None;
        }
    }

    pub fn view(&mut self, state: &MemoState) -> EditorView {
        let Some(memo) = state.current_memo.as_ref() else {
            self.mounted = None;
            return EditorView::Placeholder;
        };

        if self.mounted.as_deref() != Some(memo.path()) {
            self.generation += 1;
            self.mounted = Some(memo.path().to_string());
            tracing::debug!("Mounting editor for {} (#{})", memo.path(), self.generation);
        }

        EditorView::Editing(EditorSession {
            key: memo.path().to_string(),
            name: memo.name().to_string(),
            content: memo.content.clone(),
            mode: self.mode,
            generation: self.generation,
        })
    }
}

/// 把 markdown 渲染为终端样式文本
pub fn render_markdown(source: &str) -> String {
    let mut renderer = TerminalRenderer::default();
    for event in Parser::new(source) {
        renderer.event(event);
    }
    renderer.out.trim_end().to_string()
}

struct TerminalRenderer {
    out: String,
    styles: Vec<Style>,
    lists: Vec<Option<u64>>,
    quote_depth: usize,
    in_code_block: bool,
    at_line_start: bool,
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self {
            out: String::new(),
            styles: Vec::new(),
            lists: Vec::new(),
            quote_depth: 0,
            in_code_block: false,
            at_line_start: true,
        }
    }
}

impl TerminalRenderer {
    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => {
                if self.in_code_block {
                    let dim = Style::new().dim();
                    for line in text.lines() {
                        self.write(&dim.apply_to(line).to_string());
                        self.newline();
                    }
                } else {
                    let styled = match self.styles.last() {
                        Some(style) => style.apply_to(&*text).to_string(),
                        None => String::from(&*text),
                    };
                    self.write(&styled);
                }
            }
            Event::Code(code) => {
                let styled = Style::new().yellow().apply_to(&*code).to_string();
                self.write(&styled);
            }
            Event::SoftBreak | Event::HardBreak => self.newline(),
            Event::Rule => {
                self.write(&Style::new().dim().apply_to("────────").to_string());
                self.newline();
                self.newline();
            }
            Event::Html(html) | Event::InlineHtml(html) => {
                self.write(&Style::new().dim().apply_to(&*html).to_string());
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading { level, .. } => {
                self.write(&format!("{} ", "#".repeat(level as usize)));
                self.styles.push(Style::new().bold().cyan());
            }
            Tag::Strong => self.styles.push(Style::new().bold()),
            Tag::Emphasis => self.styles.push(Style::new().italic()),
            Tag::BlockQuote(_) => self.quote_depth += 1,
            Tag::CodeBlock(_) => self.in_code_block = true,
            Tag::List(start) => {
                if !self.at_line_start {
                    self.newline();
                }
                self.lists.push(start);
            }
            Tag::Item => {
                let indent = "  ".repeat(self.lists.len().saturating_sub(1));
                let marker = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{}. ", n);
                        *n += 1;
                        marker
                    }
                    _ => "• ".to_string(),
                };
                self.write(&format!("{}{}", indent, marker));
            }
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Heading { .. } => {
                self.styles.pop();
                self.newline();
                self.newline();
            }
            TagEnd::Strong | TagEnd::Emphasis => {
                self.styles.pop();
            }
            TagEnd::Paragraph => {
                self.newline();
                if self.lists.is_empty() {
                    self.newline();
                }
            }
            TagEnd::BlockQuote { .. } => {
                self.quote_depth = self.quote_depth.saturating_sub(1);
            }
            TagEnd::CodeBlock => {
                self.in_code_block = false;
                self.newline();
            }
            TagEnd::Item => {
                if !self.at_line_start {
                    self.newline();
                }
            }
            TagEnd::List { .. } => {
                self.lists.pop();
                if self.lists.is_empty() {
                    self.newline();
                }
            }
            _ => {}
        }
    }

    fn write(&mut self, text: &str) {
        if self.at_line_start && self.quote_depth > 0 {
            self.out.push_str(&"│ ".repeat(self.quote_depth));
        }
        self.out.push_str(text);
        self.at_line_start = false;
    }

    fn newline(&mut self) {
        self.out.push('\n');
        self.at_line_start = true;
    }
}
