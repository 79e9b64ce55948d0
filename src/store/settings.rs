use memo_types::{EditorFontSetting, InstalledFont};

use super::{PersistedSettings, Reducer, Store};

/// 用户设置（编辑器字体）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsState {
    pub editor_font: EditorFontSetting,
    pub installed_fonts: Vec<InstalledFont>,
}

#[derive(Debug, Clone)]
pub enum SettingsAction {
    SetEditorFont(EditorFontSetting),
    AddInstalledFont(InstalledFont),
    RemoveInstalledFont(String),
    ResetEditorFontToDefault,
}

impl SettingsState {
    pub fn from_persisted(settings: PersistedSettings) -> Self {
        Self {
            editor_font: settings.editor_font,
            installed_fonts: settings.installed_fonts,
        }
    }

    pub fn persisted(&self) -> PersistedSettings {
        PersistedSettings {
            editor_font: self.editor_font.clone(),
            installed_fonts: self.installed_fonts.clone(),
        }
    }

    pub fn font(&self, id: &str) -> Option<&InstalledFont> {
        self.installed_fonts.iter().find(|f| f.id == id)
    }
}

impl Reducer for SettingsState {
    type Action = SettingsAction;

    fn reduce(&mut self, action: SettingsAction) -> bool {
        match action {
            SettingsAction::SetEditorFont(font) => {
                if self.editor_font == font {
                    return false;
                }
                self.editor_font = font;
                true
            }
            SettingsAction::AddInstalledFont(font) => {
                self.installed_fonts.retain(|f| f.id != font.id);
                self.installed_fonts.push(font);
                true
            }
            SettingsAction::RemoveInstalledFont(id) => {
                let before = self.installed_fonts.len();
                self.installed_fonts.retain(|f| f.id != id);
                let mut changed = self.installed_fonts.len() != before;

                // 正在使用的字体被删除时回到默认字体
                if self.editor_font.uses_font(&id) {
                    self.editor_font = EditorFontSetting::Default;
                    changed = true;
                }
                changed
            }
            SettingsAction::ResetEditorFontToDefault => {
                self.reduce(SettingsAction::SetEditorFont(EditorFontSetting::Default))
            }
        }
    }
}

pub type SettingsStore = Store<SettingsState>;

impl Store<SettingsState> {
    pub fn set_editor_font(&self, font: EditorFontSetting) {
        self.dispatch(SettingsAction::SetEditorFont(font));
    }

    pub fn add_installed_font(&self, font: InstalledFont) {
        self.dispatch(SettingsAction::AddInstalledFont(font));
    }

    pub fn remove_installed_font(&self, id: &str) {
        self.dispatch(SettingsAction::RemoveInstalledFont(id.to_string()));
    }

    pub fn reset_editor_font_to_default(&self) {
        self.dispatch(SettingsAction::ResetEditorFontToDefault);
    }

    pub fn editor_font(&self) -> EditorFontSetting {
        self.with(|s| s.editor_font.clone())
    }

    pub fn persisted(&self) -> PersistedSettings {
        self.with(SettingsState::persisted)
    }
}
