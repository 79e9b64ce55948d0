mod output;
mod picker;

pub use output::Output;
pub use picker::{parse_path, PromptPicker};
