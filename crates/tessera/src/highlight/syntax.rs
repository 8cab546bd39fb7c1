//! Grammar-based highlighting with syntect.

use std::sync::OnceLock;

use log::{debug, trace};
use syntect::parsing::{ParseState, Scope, ScopeStack, SyntaxReference, SyntaxSet};

use super::{CodeHighlighter, HighlightedCode, Token, TokenClass};

static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();

fn syntax_set() -> &'static SyntaxSet {
    SYNTAX_SET.get_or_init(SyntaxSet::load_defaults_newlines)
}

/// Scope prefixes in lookup order, innermost scope first.
const SCOPE_CLASSES: &[(&str, TokenClass)] = &[
    ("comment", TokenClass::Comment),
    ("keyword.operator", TokenClass::Plain),
    ("string", TokenClass::String),
    ("constant.numeric", TokenClass::Number),
    ("constant.language", TokenClass::Keyword),
    ("keyword", TokenClass::Keyword),
    ("storage", TokenClass::Keyword),
];

fn scope_class(scope: Scope) -> Option<TokenClass> {
    let name = scope.build_string();
    SCOPE_CLASSES.iter().find_map(|(prefix, class)| {
        let matches = name == *prefix
            || name
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.starts_with('.'));
        matches.then_some(*class)
    })
}

fn stack_class(stack: &ScopeStack) -> TokenClass {
    stack
        .as_slice()
        .iter()
        .rev()
        .find_map(|scope| scope_class(*scope))
        .unwrap_or(TokenClass::Plain)
}

fn push_merged(tokens: &mut Vec<Token>, class: TokenClass, text: &str) {
    if text.is_empty() {
        return;
    }
    match tokens.last_mut() {
        Some(last) if last.class == class => last.text.push_str(text),
        _ => tokens.push(Token::new(class, text)),
    }
}

/// Highlighter backed by the syntect grammar collection.
///
/// Parse state carries over from line to line, so multi-line strings and
/// block comments keep their class. Scopes are reduced to [`TokenClass`]es
/// and styled by the exporter's theme rather than a syntect theme.
/// Languages are looked up by name or file extension; unknown ones come
/// back as plain text.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntectHighlighter;

impl SyntectHighlighter {
    pub fn new() -> Self {
        Self
    }

    fn find_syntax(language: &str) -> Option<&'static SyntaxReference> {
        let set = syntax_set();
        let language = language.to_ascii_lowercase();
        // The bundled grammars have no JSX or TypeScript; JavaScript is close.
        let token = match language.as_str() {
            "jsx" | "ts" | "tsx" | "typescript" => "js",
            "shell" | "zsh" => "sh",
            other => other,
        };
        set.find_syntax_by_token(token)
            .filter(|syntax| syntax.name != set.find_syntax_plain_text().name)
    }

    /// Returns `true` if a grammar exists for `language`.
    pub fn supports(&self, language: &str) -> bool {
        Self::find_syntax(language).is_some()
    }
}

impl CodeHighlighter for SyntectHighlighter {
    fn highlight(&self, code: &str, language: &str) -> HighlightedCode {
        let Some(syntax) = Self::find_syntax(language) else {
            trace!(language; "No grammar for language, using plain text");
            return HighlightedCode::plain(code, language);
        };

        let set = syntax_set();
        let mut state = ParseState::new(syntax);
        let mut stack = ScopeStack::new();
        let mut lines = Vec::new();

        for line in code.split('\n') {
            // Grammars loaded with newlines expect every line to end in one.
            let input = format!("{line}\n");
            let ops = match state.parse_line(&input, set) {
                Ok(ops) => ops,
                Err(err) => {
                    debug!(language, err:%; "Grammar failed, using plain text");
                    return HighlightedCode::plain(code, language);
                }
            };

            let mut tokens = Vec::new();
            let mut start = 0;
            for (position, op) in ops {
                let end = position.min(line.len());
                if end > start {
                    push_merged(&mut tokens, stack_class(&stack), &line[start..end]);
                    start = end;
                }
                if let Err(err) = stack.apply(&op) {
                    debug!(language, err:?; "Scope stack out of sync, using plain text");
                    return HighlightedCode::plain(code, language);
                }
            }
            push_merged(&mut tokens, stack_class(&stack), &line[start..]);
            lines.push(tokens);
        }

        HighlightedCode {
            language: language.to_string(),
            lines,
            highlighted: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(code: &HighlightedCode, class: TokenClass) -> Vec<String> {
        code.lines()
            .iter()
            .flatten()
            .filter(|token| token.class() == class)
            .map(|token| token.text().trim().to_string())
            .collect()
    }

    #[test]
    fn test_rust_classes() {
        let code = SyntectHighlighter.highlight("let x = 42; // answer", "rust");

        assert!(code.is_highlighted());
        assert_eq!(text_of(&code, TokenClass::Comment), ["// answer"]);
        assert!(text_of(&code, TokenClass::Number).contains(&"42".to_string()));
        assert!(text_of(&code, TokenClass::Keyword).contains(&"let".to_string()));
    }

    #[test]
    fn test_multiline_string_keeps_state() {
        let code = SyntectHighlighter.highlight("s = \"\"\"one\ntwo\"\"\"", "python");

        assert_eq!(code.line_count(), 2);
        assert_eq!(code.lines()[1][0].class(), TokenClass::String);
    }

    #[test]
    fn test_keyword_inside_multiline_string_stays_string() {
        let code = SyntectHighlighter.highlight("s = \"\"\"one\nif two\"\"\"", "python");

        assert_eq!(
            code.lines()[1],
            [Token::new(TokenClass::String, "if two\"\"\"")]
        );
    }

    #[test]
    fn test_operators_are_plain() {
        let code = SyntectHighlighter.highlight("x = 1", "python");

        assert!(text_of(&code, TokenClass::Keyword).is_empty());
        assert_eq!(text_of(&code, TokenClass::Number), ["1"]);
    }

    #[test]
    fn test_lookup_by_name_extension_and_alias() {
        let highlighter = SyntectHighlighter::new();
        assert!(highlighter.supports("rs"));
        assert!(highlighter.supports("Python"));
        assert!(highlighter.supports("jsx"));
        assert!(highlighter.supports("typescript"));
        assert!(!highlighter.supports("text"));
        assert!(!highlighter.supports("no-such-language"));
    }

    #[test]
    fn test_unknown_language_is_plain() {
        let code = SyntectHighlighter.highlight("just words", "no-such-language");
        assert!(!code.is_highlighted());
        assert_eq!(code.to_plain_text(), "just words");
    }

    #[test]
    fn test_text_is_preserved() {
        let source = "fn main() {\n    println!(\"héllo\");\n}\n";
        for language in ["rust", "python", "js", "sql"] {
            let code = SyntectHighlighter.highlight(source, language);
            assert_eq!(code.to_plain_text(), source, "{language}");
        }
    }
}
