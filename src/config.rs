//! Config files - TOML form of [`TypewriterProps`].
//!
//! Every prop that can be expressed as data has a key here. Keys are
//! snake_case; the camelCase spelling (`typingSpeed`, `loop`, ...) is accepted
//! as an alias. Colors are strings and attributes are names, both validated
//! when converting into props.
//!
//! ```toml
//! text = ["Hello there", "General Kenobi"]
//! typing_speed = 60
//! loop = true
//! text_colors = ["#ff79c6", "cyan"]
//! attrs = ["bold"]
//!
//! [variable_speed]
//! min = 30
//! max = 120
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::{Result, TypewriterError};
use crate::primitives::{PropValue, TextSource, TypewriterProps};
use crate::state::machine::SpeedRange;
use crate::types::{Attr, Rgba};

/// Deserializable typewriter configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TypewriterConfig {
    pub id: Option<String>,
    pub text: TextSource,
    #[serde(alias = "typingSpeed")]
    pub typing_speed: u64,
    #[serde(alias = "deletingSpeed")]
    pub deleting_speed: u64,
    #[serde(alias = "initialDelay")]
    pub initial_delay: u64,
    #[serde(alias = "pauseDuration")]
    pub pause_duration: u64,
    #[serde(rename = "loop", alias = "loop_text")]
    pub loop_text: bool,
    #[serde(alias = "variableSpeed")]
    pub variable_speed: Option<SpeedRange>,
    #[serde(alias = "reverseMode")]
    pub reverse_mode: bool,
    #[serde(alias = "textColors")]
    pub text_colors: Vec<String>,
    pub color: Option<String>,
    pub attrs: Vec<String>,
    #[serde(alias = "showCursor")]
    pub show_cursor: bool,
    #[serde(alias = "cursorCharacter")]
    pub cursor_character: String,
    #[serde(alias = "cursorBlinkDuration")]
    pub cursor_blink_duration: u64,
    #[serde(alias = "hideCursorWhileTyping")]
    pub hide_cursor_while_typing: bool,
    #[serde(alias = "startOnVisible")]
    pub start_on_visible: bool,
    pub seed: Option<u64>,
}

impl Default for TypewriterConfig {
    fn default() -> Self {
        let props = TypewriterProps::default();
        Self {
            id: None,
            text: props.text,
            typing_speed: props.typing_speed,
            deleting_speed: props.deleting_speed,
            initial_delay: props.initial_delay,
            pause_duration: props.pause_duration,
            loop_text: props.loop_text,
            variable_speed: None,
            reverse_mode: props.reverse_mode,
            text_colors: Vec::new(),
            color: None,
            attrs: Vec::new(),
            show_cursor: props.show_cursor,
            cursor_character: props.cursor_character,
            cursor_blink_duration: props.cursor_blink_duration,
            hide_cursor_while_typing: props.hide_cursor_while_typing,
            start_on_visible: props.start_on_visible,
            seed: None,
        }
    }
}

impl TypewriterConfig {
    /// Parse a config from TOML text.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Read and parse a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| TypewriterError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        debug!(path = %path.display(), "loaded typewriter config");
        Ok(config)
    }

    /// Convert into props, validating colors and attributes.
    ///
    /// The completion callback cannot come from a file and is left unset.
    pub fn into_props(self) -> Result<TypewriterProps> {
        let text_colors = self
            .text_colors
            .iter()
            .map(|c| parse_color(c))
            .collect::<Result<Vec<_>>>()?;
        let fg = self.color.as_deref().map(parse_color).transpose()?;
        let attrs = self.attrs.iter().try_fold(Attr::NONE, |acc, name| {
            Attr::from_config_name(name)
                .map(|a| acc | a)
                .ok_or_else(|| TypewriterError::InvalidAttr(name.clone()))
        })?;

        Ok(TypewriterProps {
            id: self.id,
            text: self.text,
            reverse_mode: self.reverse_mode,
            loop_text: self.loop_text,
            typing_speed: self.typing_speed,
            deleting_speed: self.deleting_speed,
            initial_delay: self.initial_delay,
            pause_duration: self.pause_duration,
            variable_speed: self.variable_speed.map(SpeedRange::normalized),
            seed: self.seed,
            text_colors,
            fg: fg.map(PropValue::Static),
            attrs: (!attrs.is_empty()).then_some(PropValue::Static(attrs)),
            show_cursor: self.show_cursor,
            cursor_character: self.cursor_character,
            cursor_blink_duration: self.cursor_blink_duration,
            hide_cursor_while_typing: self.hide_cursor_while_typing,
            start_on_visible: self.start_on_visible,
            on_sentence_complete: None,
        })
    }
}

fn parse_color(input: &str) -> Result<Rgba> {
    Rgba::parse(input).ok_or_else(|| TypewriterError::InvalidColor(input.to_string()))
}
