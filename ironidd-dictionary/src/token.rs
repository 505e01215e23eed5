/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Token splitter and header stripper.
//!
//! Raw dictionary text is split line by line into [`Token`]s:
//! - content segments terminated by `,` or `;`
//! - directive runs starting at a `\` (each `\` starts a new directive)
//! - standalone comments from comment-only lines
//!
//! Every `!` starts a comment that runs to the end of its line. The comment
//! is removed from the content and attached to the last token of the line.
//!
//! A trailing `,` or `;` on a directive is a separator only when the run
//! follows content on the same line (`TestObj,\memo test object;`). On a line
//! of its own the directive text is kept as written.

use crate::grammar::Grammar;
use memchr::{memchr, memchr3};
use smallvec::SmallVec;

/// Separator that terminated a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Separator {
    /// `,` continues the current declaration.
    Comma,
    /// `;` closes the current declaration.
    Semicolon,
}

impl Separator {
    #[inline]
    const fn from_byte(b: u8) -> Option<Self> {
        match b {
            b',' => Some(Self::Comma),
            b';' => Some(Self::Semicolon),
            _ => None,
        }
    }
}

/// Kind of a logical token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// Non-directive text, trimmed.
    Content {
        /// Segment text.
        text: String,
        /// Separator that ended the segment, if any.
        terminator: Option<Separator>,
    },
    /// Directive text following a backslash, trimmed.
    Directive {
        /// Directive text without the backslash or trailing separator.
        text: String,
        /// Trailing `,` or `;` stripped from an inline directive, if any.
        terminator: Option<Separator>,
    },
    /// A comment-only line.
    Comment(String),
}

/// One logical token with its position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// What the token carries.
    pub kind: TokenKind,
    /// 1-based source line.
    pub line: usize,
    /// Trailing comment of the physical line, on the line's last token.
    pub comment: Option<String>,
}

impl Token {
    fn new(kind: TokenKind, line: usize) -> Self {
        Self {
            kind,
            line,
            comment: None,
        }
    }
}

/// Dictionary header metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Header {
    /// Raw header lines joined by newlines.
    pub text: String,
    /// Value of `!IDD_Version`.
    pub version: Option<String>,
    /// Value of `!IDD_BUILD`.
    pub build: Option<String>,
}

impl Header {
    /// Extracts the header: the leading run of comment-only lines.
    ///
    /// # Arguments
    /// * `text` - The raw dictionary text
    #[must_use]
    pub fn extract(text: &str) -> Self {
        let grammar = Grammar::get();
        let mut header = Self::default();
        let mut lines = Vec::new();

        for line in text.lines() {
            let trimmed = line.trim_start();
            if !trimmed.starts_with('!') {
                break;
            }
            if header.version.is_none() {
                header.version = grammar.header_version(trimmed).map(str::to_string);
            }
            if header.build.is_none() {
                header.build = grammar.header_build(trimmed).map(str::to_string);
            }
            lines.push(line);
        }

        header.text = lines.join("\n");
        header
    }
}

/// Splits raw dictionary text into tokens.
///
/// # Arguments
/// * `text` - The raw dictionary text
#[must_use]
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    for (i, line) in text.lines().enumerate() {
        tokens.extend(split_line(line, i + 1));
    }
    tokens
}

/// Splits one physical line.
fn split_line(line: &str, line_no: usize) -> SmallVec<[Token; 4]> {
    let mut out: SmallVec<[Token; 4]> = SmallVec::new();

    let (content, comment) = match memchr(b'!', line.as_bytes()) {
        Some(pos) => (&line[..pos], Some(line[pos + 1..].to_string())),
        None => (line, None),
    };

    let mut rest = content;
    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            break;
        }

        if let Some(run) = rest.strip_prefix('\\') {
            let inline = !out.is_empty();
            for piece in run.split('\\') {
                let (text, terminator) = if inline {
                    strip_terminator(piece)
                } else {
                    (piece.trim(), None)
                };
                if text.is_empty() && terminator.is_none() {
                    continue;
                }
                out.push(Token::new(
                    TokenKind::Directive {
                        text: text.to_string(),
                        terminator,
                    },
                    line_no,
                ));
            }
            break;
        }

        match memchr3(b',', b';', b'\\', rest.as_bytes()) {
            Some(pos) if rest.as_bytes()[pos] == b'\\' => {
                out.push(content_token(&rest[..pos], None, line_no));
                rest = &rest[pos..];
            }
            Some(pos) => {
                let terminator = Separator::from_byte(rest.as_bytes()[pos]);
                out.push(content_token(&rest[..pos], terminator, line_no));
                rest = &rest[pos + 1..];
            }
            None => {
                out.push(content_token(rest, None, line_no));
                break;
            }
        }
    }

    if let Some(comment) = comment {
        match out.last_mut() {
            Some(last) => last.comment = Some(comment),
            None => out.push(Token::new(TokenKind::Comment(comment), line_no)),
        }
    }

    out
}

fn content_token(text: &str, terminator: Option<Separator>, line_no: usize) -> Token {
    Token::new(
        TokenKind::Content {
            text: text.trim().to_string(),
            terminator,
        },
        line_no,
    )
}

/// Strips one trailing `,` or `;` from directive text.
fn strip_terminator(piece: &str) -> (&str, Option<Separator>) {
    let trimmed = piece.trim();
    match trimmed.as_bytes().last().copied().and_then(Separator::from_byte) {
        Some(sep) => (trimmed[..trimmed.len() - 1].trim_end(), Some(sep)),
        None => (trimmed, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content(text: &str, terminator: Option<Separator>) -> TokenKind {
        TokenKind::Content {
            text: text.to_string(),
            terminator,
        }
    }

    fn directive(text: &str, terminator: Option<Separator>) -> TokenKind {
        TokenKind::Directive {
            text: text.to_string(),
            terminator,
        }
    }

    fn kinds(text: &str) -> Vec<TokenKind> {
        tokenize(text).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_content_and_comment() {
        let tokens = tokenize("  A1 , ! the name field");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, content("A1", Some(Separator::Comma)));
        assert_eq!(tokens[0].comment.as_deref(), Some(" the name field"));
    }

    #[test]
    fn test_comment_only_line() {
        assert_eq!(
            kinds("   ! just a comment"),
            vec![TokenKind::Comment(" just a comment".to_string())]
        );
        assert!(kinds("   ").is_empty());
    }

    #[test]
    fn test_separator_inside_comment_is_ignored() {
        assert_eq!(
            kinds("Foo; ! a, b; c"),
            vec![content("Foo", Some(Separator::Semicolon))]
        );
    }

    #[test]
    fn test_directive_run_after_content() {
        assert_eq!(
            kinds("N1,\\field Value,\\type real,\\minimum 0,\\maximum 100;"),
            vec![
                content("N1", Some(Separator::Comma)),
                directive("field Value", Some(Separator::Comma)),
                directive("type real", Some(Separator::Comma)),
                directive("minimum 0", Some(Separator::Comma)),
                directive("maximum 100", Some(Separator::Semicolon)),
            ]
        );
    }

    #[test]
    fn test_directive_keeps_inner_commas() {
        assert_eq!(
            kinds("      \\memo Walls, roofs, and floors"),
            vec![directive("memo Walls, roofs, and floors", None)]
        );
    }

    #[test]
    fn test_standalone_directive_keeps_trailing_separator() {
        assert_eq!(
            kinds("      \\memo Covers walls, roofs,\n      \\memo floors; and ceilings;"),
            vec![
                directive("memo Covers walls, roofs,", None),
                directive("memo floors; and ceilings;", None),
            ]
        );
        assert_eq!(
            kinds("  \\note Enter a name,\\key Yes;"),
            vec![
                directive("note Enter a name,", None),
                directive("key Yes;", None),
            ]
        );
    }

    #[test]
    fn test_inline_directive_strips_separator() {
        assert_eq!(
            kinds("TestObj,\\memo test object;"),
            vec![
                content("TestObj", Some(Separator::Comma)),
                directive("memo test object", Some(Separator::Semicolon)),
            ]
        );
    }

    #[test]
    fn test_several_fields_on_one_line() {
        assert_eq!(
            kinds("  N1, N2, N3;"),
            vec![
                content("N1", Some(Separator::Comma)),
                content("N2", Some(Separator::Comma)),
                content("N3", Some(Separator::Semicolon)),
            ]
        );
    }

    #[test]
    fn test_content_without_separator_before_directive() {
        assert_eq!(
            kinds("A1 \\field Name"),
            vec![content("A1", None), directive("field Name", None)]
        );
    }

    #[test]
    fn test_line_numbers() {
        let tokens = tokenize("Foo,\n\n  A1;\n");
        assert_eq!(tokens[0].line, 1);
        assert_eq!(tokens[1].line, 3);
    }

    #[test]
    fn test_header_extract() {
        let text = "!IDD_Version 3.4.0\n!IDD_BUILD abc123\n! more header\n\nFoo;\n";
        let header = Header::extract(text);
        assert_eq!(header.version.as_deref(), Some("3.4.0"));
        assert_eq!(header.build.as_deref(), Some("abc123"));
        assert_eq!(header.text.lines().count(), 3);
    }

    #[test]
    fn test_header_stops_at_content() {
        let header = Header::extract("Foo;\n!IDD_Version 1.0\n");
        assert!(header.text.is_empty());
        assert!(header.version.is_none());
    }
}
