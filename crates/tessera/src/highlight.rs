//! Code highlighter adapter.
//!
//! Code blocks are handed to a [`CodeHighlighter`] together with their
//! language tag. Highlighting never fails: a language the highlighter does
//! not know is returned as plain text, one token per line.
//!
//! [`SyntectHighlighter`] is the bundled implementation.

mod syntax;

pub use syntax::SyntectHighlighter;

/// Lexical class of a highlighted token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenClass {
    Keyword,
    String,
    Comment,
    Number,
    Plain,
}

impl TokenClass {
    /// CSS class used by exported views.
    pub fn css_class(self) -> &'static str {
        match self {
            TokenClass::Keyword => "tok-kw",
            TokenClass::String => "tok-str",
            TokenClass::Comment => "tok-com",
            TokenClass::Number => "tok-num",
            TokenClass::Plain => "tok-plain",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    class: TokenClass,
    text: String,
}

impl Token {
    pub fn new(class: TokenClass, text: impl Into<String>) -> Self {
        Self {
            class,
            text: text.into(),
        }
    }

    pub fn class(&self) -> TokenClass {
        self.class
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// A code block split into lines of classified tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightedCode {
    language: String,
    lines: Vec<Vec<Token>>,
    highlighted: bool,
}

impl HighlightedCode {
    /// Plain rendition of `code`: one unclassified token per non-empty line.
    pub fn plain(code: &str, language: &str) -> Self {
        let lines = code
            .split('\n')
            .map(|line| {
                if line.is_empty() {
                    Vec::new()
                } else {
                    vec![Token::new(TokenClass::Plain, line)]
                }
            })
            .collect();
        Self {
            language: language.to_string(),
            lines,
            highlighted: false,
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn lines(&self) -> &[Vec<Token>] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Returns `true` if a language grammar was applied.
    pub fn is_highlighted(&self) -> bool {
        self.highlighted
    }

    /// Reassemble the original code from the tokens.
    pub fn to_plain_text(&self) -> String {
        self.lines
            .iter()
            .map(|line| line.iter().map(Token::text).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Turns a code block into highlighted lines.
pub trait CodeHighlighter: Send + Sync {
    /// Highlight `code` written in `language`.
    ///
    /// Implementations must not fail; an unsupported language yields
    /// [`HighlightedCode::plain`].
    fn highlight(&self, code: &str, language: &str) -> HighlightedCode;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_keeps_empty_lines() {
        let code = HighlightedCode::plain("+++>.\n\n<<", "brainfuck");

        assert!(!code.is_highlighted());
        assert_eq!(code.language(), "brainfuck");
        assert_eq!(code.line_count(), 3);
        assert!(code.lines()[1].is_empty());
        assert_eq!(code.lines()[2], [Token::new(TokenClass::Plain, "<<")]);
        assert_eq!(code.to_plain_text(), "+++>.\n\n<<");
    }

    #[test]
    fn test_css_classes_are_distinct() {
        let classes = [
            TokenClass::Keyword,
            TokenClass::String,
            TokenClass::Comment,
            TokenClass::Number,
            TokenClass::Plain,
        ]
        .map(TokenClass::css_class);

        for (index, class) in classes.iter().enumerate() {
            assert!(!classes[index + 1..].contains(class), "{class}");
        }
    }
}
