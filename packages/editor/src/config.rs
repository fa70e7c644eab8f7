use serde::{Deserialize, Serialize};

/// Editing surface options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorConfig {
    /// Id of the element the surface mounts into
    #[serde(default = "default_holder")]
    pub holder: String,

    /// Hint shown in an empty surface
    #[serde(default = "default_placeholder")]
    pub placeholder: String,

    #[serde(default = "default_inline_toolbar")]
    pub inline_toolbar: bool,
}

fn default_holder() -> String {
    "editor".to_string()
}

fn default_placeholder() -> String {
    "Type here to write your journal...".to_string()
}

fn default_inline_toolbar() -> bool {
    true
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            holder: default_holder(),
            placeholder: default_placeholder(),
            inline_toolbar: default_inline_toolbar(),
        }
    }
}

impl EditorConfig {
    pub fn with_holder(mut self, holder: impl Into<String>) -> Self {
        self.holder = holder.into();
        self
    }
}
