//! PGN game-record parsing.
//!
//! A [`PgnGame`] holds the tag pairs and the flat SAN move list of one
//! game. Parsing is deliberately fail-fast: any malformed construct makes
//! the whole record unusable, matching the all-or-nothing extraction
//! contract for game-record input. Comments, numeric annotation glyphs,
//! and recursive variations are stripped; only mainline moves survive.

use std::collections::BTreeMap;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum PgnParseError {
    #[display("malformed tag pair: {line}")]
    MalformedTag { line: String },
    #[display("unterminated comment in movetext")]
    UnterminatedComment,
    #[display("unbalanced variation in movetext")]
    UnbalancedVariation,
    #[display("unexpected token '{token}' in movetext")]
    UnexpectedToken { token: String },
}

/// A parsed PGN game: header tags plus the mainline move list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PgnGame {
    pub tags: BTreeMap<String, String>,
    pub moves: Vec<String>,
}

impl PgnGame {
    /// Parses a single PGN game record.
    pub fn parse(input: &str) -> Result<Self, PgnParseError> {
        let mut tags = BTreeMap::new();
        let mut movetext = String::new();

        for line in input.lines() {
            let trimmed = line.trim();
            if trimmed.starts_with('%') {
                // Escape mechanism lines are ignored wholesale.
                continue;
            }
            if trimmed.starts_with('[') && movetext.trim().is_empty() {
                let (key, value) =
                    parse_tag_line(trimmed).ok_or_else(|| PgnParseError::MalformedTag {
                        line: trimmed.to_string(),
                    })?;
                tags.insert(key, value);
            } else {
                // Line boundaries must survive: rest-of-line comments
                // end at the newline.
                movetext.push_str(line);
                movetext.push('\n');
            }
        }

        let moves = tokenize_movetext(&movetext)?;
        Ok(Self { tags, moves })
    }
}

fn parse_tag_line(line: &str) -> Option<(String, String)> {
    let inner = line.strip_prefix('[')?.strip_suffix(']')?;
    let (key, rest) = inner.split_once(char::is_whitespace)?;
    let value = rest.trim().strip_prefix('"')?.strip_suffix('"')?;
    if key.is_empty() {
        return None;
    }
    Some((key.to_string(), value.to_string()))
}

fn tokenize_movetext(text: &str) -> Result<Vec<String>, PgnParseError> {
    let mut moves = Vec::new();
    let mut chars = text.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            _ if c.is_whitespace() => {
                chars.next();
            }
            '{' => {
                chars.next();
                if !chars.by_ref().any(|c| c == '}') {
                    return Err(PgnParseError::UnterminatedComment);
                }
            }
            ';' => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        break;
                    }
                }
            }
            '(' => {
                let mut depth = 0usize;
                for c in chars.by_ref() {
                    match c {
                        '(' => depth += 1,
                        ')' => {
                            depth -= 1;
                            if depth == 0 {
                                break;
                            }
                        }
                        _ => {}
                    }
                }
                if depth != 0 {
                    return Err(PgnParseError::UnbalancedVariation);
                }
            }
            ')' => {
                return Err(PgnParseError::UnbalancedVariation);
            }
            '$' => {
                chars.next();
                while chars.peek().is_some_and(char::is_ascii_digit) {
                    chars.next();
                }
            }
            '*' => {
                chars.next();
            }
            _ => {
                let mut token = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_whitespace() || matches!(c, '{' | '(' | ')' | ';') {
                        break;
                    }
                    token.push(c);
                    chars.next();
                }
                classify_token(&token, &mut moves)?;
            }
        }
    }

    Ok(moves)
}

/// Sorts one whitespace-delimited token into a move, a move number, or a
/// game result. Move numbers glued to moves ("1.e4") are split apart.
fn classify_token(token: &str, moves: &mut Vec<String>) -> Result<(), PgnParseError> {
    if matches!(token, "1-0" | "0-1" | "1/2-1/2") {
        return Ok(());
    }

    let body = if token.starts_with(|c: char| c.is_ascii_digit()) && token.contains('.') {
        let rest = token.trim_start_matches(|c: char| c.is_ascii_digit());
        let Some(rest) = rest.strip_prefix('.') else {
            return Err(PgnParseError::UnexpectedToken {
                token: token.to_string(),
            });
        };
        rest.trim_start_matches('.')
    } else {
        token
    };

    if body.is_empty() {
        return Ok(());
    }
    if body.starts_with(|c: char| {
        c.is_ascii_lowercase() || matches!(c, 'N' | 'B' | 'R' | 'Q' | 'K' | 'O' | '0')
    }) {
        moves.push(body.to_string());
        Ok(())
    } else {
        Err(PgnParseError::UnexpectedToken {
            token: token.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_record() {
        let pgn = r#"[Event "Casual Game"]
[White "Anderssen, Adolf"]
[Black "Kieseritzky, Lionel"]
[Date "1851.06.21"]
[Result "1-0"]

1. e4 e5 2. f4 exf4 3. Bc4 Qh4+ 4. Kf1 1-0
"#;
        let game = PgnGame::parse(pgn).unwrap();
        assert_eq!(game.tags["Event"], "Casual Game");
        assert_eq!(game.tags["Date"], "1851.06.21");
        assert_eq!(
            game.moves,
            vec!["e4", "e5", "f4", "exf4", "Bc4", "Qh4+", "Kf1"]
        );
    }

    #[test]
    fn test_comments_nags_and_variations_stripped() {
        let pgn = "1. e4 {best by test} e5 $1 2. Nf3 (2. f4 exf4 (2... d5)) Nc6 1/2-1/2";
        let game = PgnGame::parse(pgn).unwrap();
        assert_eq!(game.moves, vec!["e4", "e5", "Nf3", "Nc6"]);
    }

    #[test]
    fn test_rest_of_line_comment_ends_at_newline() {
        let game = PgnGame::parse("1. e4 e5 ; King's pawn\n2. Nf3 Nc6").unwrap();
        assert_eq!(game.moves, vec!["e4", "e5", "Nf3", "Nc6"]);
    }

    #[test]
    fn test_glued_move_numbers() {
        let game = PgnGame::parse("1.e4 e5 2.Nf3 2...Nc6 *").unwrap();
        assert_eq!(game.moves, vec!["e4", "e5", "Nf3", "Nc6"]);
    }

    #[test]
    fn test_castling_token_survives() {
        let game = PgnGame::parse("1. e4 e5 2. Nf3 Nc6 3. Bc4 Bc5 4. O-O Nf6").unwrap();
        assert!(game.moves.contains(&"O-O".to_string()));
    }

    #[test]
    fn test_malformed_inputs_rejected() {
        assert!(matches!(
            PgnGame::parse("[Event Casual]\n\n1. e4"),
            Err(PgnParseError::MalformedTag { .. })
        ));
        assert!(matches!(
            PgnGame::parse("1. e4 {never closed"),
            Err(PgnParseError::UnterminatedComment)
        ));
        assert!(matches!(
            PgnGame::parse("1. e4 (2. f4"),
            Err(PgnParseError::UnbalancedVariation)
        ));
        assert!(matches!(
            PgnGame::parse("1. e4 ?? e5"),
            Err(PgnParseError::UnexpectedToken { .. })
        ));
    }

    #[test]
    fn test_empty_movetext() {
        let game = PgnGame::parse("[Event \"Adjourned\"]\n").unwrap();
        assert!(game.moves.is_empty());
        assert_eq!(game.tags.len(), 1);
    }
}
