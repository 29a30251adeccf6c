//! Fenced diagram block rewriting.
//!
//! [`FenceConverter`] finds code fences opened with a language tag
//! (`` ```mermaid `` by default) and rewrites each of them into an HTML
//! wrapper element that client-side diagram libraries pick up:
//!
//! ````text
//! ```mermaid                 <div class="mermaid">
//! graph TD;          --->    graph TD;
//! A-->B;                     A-->B;
//! ```                        </div>
//! ````
//!
//! The fence content is copied verbatim. Only the opening token at the start
//! of a line is recognized, and the block ends at the first line consisting of
//! exactly three backticks. Both `\n` and `\r\n` line endings are accepted and
//! kept in the output.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Default fence language tag.
pub const DEFAULT_LANGUAGE: &str = "mermaid";

/// Default class attribute of the wrapper element.
pub const DEFAULT_CLASS: &str = "mermaid";

static DEFAULT_CONVERTER: LazyLock<FenceConverter> =
    LazyLock::new(|| FenceConverter::new(DEFAULT_LANGUAGE, DEFAULT_CLASS).unwrap());

/// Error building a [`FenceConverter`].
#[derive(Debug, thiserror::Error)]
pub enum FenceError {
    /// Language tag is empty or contains whitespace or backticks.
    #[error("invalid fence language '{0}': must be non-empty without whitespace or backticks")]
    InvalidLanguage(String),
    /// Class name is empty or contains characters that break the HTML tag.
    #[error("invalid wrapper class '{0}': must be non-empty without '\"', '<' or '>'")]
    InvalidClass(String),
    /// Pattern compilation failed.
    #[error("failed to compile fence pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Result of a conversion pass over one document.
#[derive(Debug)]
pub struct Conversion<'a> {
    /// Rewritten text. Borrowed from the input when nothing matched.
    pub text: Cow<'a, str>,
    /// Number of fenced blocks rewritten.
    pub blocks: usize,
}

impl Conversion<'_> {
    /// Whether at least one block was rewritten.
    #[must_use]
    pub fn is_changed(&self) -> bool {
        self.blocks > 0
    }
}

/// Rewrites fenced blocks of one language into `<div class="...">` wrappers.
#[derive(Debug, Clone)]
pub struct FenceConverter {
    pattern: Regex,
    opening_token: String,
    open_tag: String,
}

impl FenceConverter {
    /// Create a converter for fences tagged `language`, wrapped with `class`.
    ///
    /// # Example
    ///
    /// ```
    /// use mdiv_convert::FenceConverter;
    ///
    /// let converter = FenceConverter::new("mermaid", "mermaid").unwrap();
    /// let conversion = converter.convert("```mermaid\nA-->B;\n```\n");
    /// assert_eq!(conversion.text, "<div class=\"mermaid\">\nA-->B;\n</div>\n");
    /// ```
    pub fn new(language: &str, class: &str) -> Result<Self, FenceError> {
        if language.is_empty()
            || language
                .chars()
                .any(|c| c.is_whitespace() || c == '`')
        {
            return Err(FenceError::InvalidLanguage(language.to_owned()));
        }
        if class.is_empty() || class.contains(['"', '<', '>']) {
            return Err(FenceError::InvalidClass(class.to_owned()));
        }

        // The optional body group is lazy so that an empty block closes at
        // its own fence instead of running on to the next one.
        let pattern = Regex::new(&format!(
            r"(?ms)^```{}(?P<eol>\r?\n)(?:(?P<body>.*?)\r?\n)??```(?P<end>\r?\n|\z)",
            regex::escape(language)
        ))?;

        Ok(Self {
            pattern,
            opening_token: format!("```{language}"),
            open_tag: format!("<div class=\"{class}\">"),
        })
    }

    /// Literal token that opens a fence this converter rewrites.
    ///
    /// Text that does not contain it is guaranteed to convert to itself.
    #[must_use]
    pub fn opening_token(&self) -> &str {
        &self.opening_token
    }

    /// Rewrite every matching fenced block in `text`.
    pub fn convert<'a>(&self, text: &'a str) -> Conversion<'a> {
        let mut blocks = 0;
        let text = self.pattern.replace_all(text, |caps: &Captures<'_>| {
            blocks += 1;
            // The wrapper reuses the line ending of the opening fence.
            let eol = &caps["eol"];
            let end = &caps["end"];
            match caps.name("body") {
                Some(body) => format!("{}{eol}{}{eol}</div>{end}", self.open_tag, body.as_str()),
                None => format!("{}{eol}</div>{end}", self.open_tag),
            }
        });
        Conversion { text, blocks }
    }
}

impl Default for FenceConverter {
    fn default() -> Self {
        DEFAULT_CONVERTER.clone()
    }
}

/// Rewrite `` ```mermaid `` blocks in `text` with the default converter.
pub fn convert(text: &str) -> Cow<'_, str> {
    DEFAULT_CONVERTER.convert(text).text
}
