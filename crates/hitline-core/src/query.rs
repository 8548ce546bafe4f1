//! Boolean query language.
//!
//! Terms are bare words or `"quoted phrases"`; `AND` / `OR` (any case) are
//! binary operators and parentheses group. Adjacent terms with no operator
//! between them are ANDed. A term is true when its lowercase text is a
//! substring of the (already lowercase) haystack.
//!
//! Evaluation is strictly left to right with a single pending-operator slot:
//! `AND` and `OR` bind equally, so `a OR b AND c` means `(a OR b) AND c`.
//! Saved queries depend on this, so it stays.

use std::sync::LazyLock;

use regex::{Captures, Regex};

static PHRASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"]+)""#).expect("phrase pattern must compile"));

// Private-use code points delimit phrase placeholders so they can never
// collide with user text or be split by the tokenizer.
const PLACEHOLDER_OPEN: char = '\u{E000}';
const PLACEHOLDER_CLOSE: char = '\u{E001}';

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Open,
    Close,
    And,
    Or,
    /// Lowercase word or phrase text.
    Term(String),
}

#[derive(Debug, Clone, Copy)]
enum Op {
    And,
    Or,
}

/// A tokenized query, ready to be matched against many haystacks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    tokens: Vec<Token>,
}

impl Query {
    pub fn parse(query: &str) -> Self {
        Self {
            tokens: tokenize(query),
        }
    }

    /// True when the query has no tokens at all (blank input).
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Evaluate against a haystack that the caller has already lowercased.
    /// An empty or operator-only query never matches.
    pub fn matches(&self, lower_haystack: &str) -> bool {
        evaluate_tokens(&self.tokens, lower_haystack)
    }
}

/// One-shot evaluation; lowercases `haystack` itself.
pub fn evaluate(query: &str, haystack: &str) -> bool {
    Query::parse(query).matches(&haystack.to_lowercase())
}

/// The flat list of lowercase terms in `query`, for highlighting.
///
/// Phrases come first in order of appearance, then bare words. Operators and
/// parentheses are dropped and duplicates kept only once.
pub fn extract_terms(query: &str) -> Vec<String> {
    let mut terms = Vec::new();

    for caps in PHRASE.captures_iter(query) {
        push_unique(&mut terms, caps[1].to_lowercase());
    }

    let remaining = PHRASE.replace_all(query, "");
    for word in remaining.replace(['(', ')'], " ").split_whitespace() {
        let word = word.to_lowercase();
        if word != "and" && word != "or" {
            push_unique(&mut terms, word);
        }
    }

    terms
}

fn push_unique(terms: &mut Vec<String>, term: String) {
    if !term.is_empty() && !terms.contains(&term) {
        terms.push(term);
    }
}

// ---------------------------------------------------------------------------
// Tokenizer
// ---------------------------------------------------------------------------

fn tokenize(query: &str) -> Vec<Token> {
    let mut phrases: Vec<String> = Vec::new();
    let working = PHRASE.replace_all(query, |caps: &Captures| {
        phrases.push(caps[1].to_lowercase());
        format!("{PLACEHOLDER_OPEN}{}{PLACEHOLDER_CLOSE}", phrases.len() - 1)
    });

    let mut tokens = Vec::new();
    let mut current = String::new();
    for ch in working.chars() {
        match ch {
            '(' | ')' => {
                flush(&mut current, &mut tokens, &phrases);
                tokens.push(if ch == '(' { Token::Open } else { Token::Close });
            }
            c if c.is_whitespace() => flush(&mut current, &mut tokens, &phrases),
            c => current.push(c),
        }
    }
    flush(&mut current, &mut tokens, &phrases);

    tokens
}

fn flush(current: &mut String, tokens: &mut Vec<Token>, phrases: &[String]) {
    if current.is_empty() {
        return;
    }
    let word = std::mem::take(current);
    let token = if let Some(phrase) = restore_phrase(&word, phrases) {
        Token::Term(phrase)
    } else if word.eq_ignore_ascii_case("and") {
        Token::And
    } else if word.eq_ignore_ascii_case("or") {
        Token::Or
    } else {
        Token::Term(word.to_lowercase())
    };
    tokens.push(token);
}

/// A word starting with a placeholder becomes that phrase; any text glued
/// after the closing quote is dropped.
fn restore_phrase(word: &str, phrases: &[String]) -> Option<String> {
    let rest = word.strip_prefix(PLACEHOLDER_OPEN)?;
    let (index, _) = rest.split_once(PLACEHOLDER_CLOSE)?;
    phrases.get(index.parse::<usize>().ok()?).cloned()
}

// ---------------------------------------------------------------------------
// Evaluator
// ---------------------------------------------------------------------------

fn evaluate_tokens(tokens: &[Token], haystack: &str) -> bool {
    let mut result: Option<bool> = None;
    let mut pending: Option<Op> = None;
    let mut i = 0;

    while i < tokens.len() {
        let value = match &tokens[i] {
            Token::Open => {
                let (inner, next) = match matching_close(tokens, i) {
                    Some(end) => (&tokens[i + 1..end], end + 1),
                    // Unclosed: the group ends the query and loses its last token.
                    None => (&tokens[i + 1..(tokens.len() - 1).max(i + 1)], tokens.len()),
                };
                i = next;
                evaluate_tokens(inner, haystack)
            }
            Token::Close => {
                i += 1;
                continue;
            }
            Token::And => {
                pending = Some(Op::And);
                i += 1;
                continue;
            }
            Token::Or => {
                pending = Some(Op::Or);
                i += 1;
                continue;
            }
            Token::Term(term) => {
                i += 1;
                haystack.contains(term.as_str())
            }
        };

        // The operator is consumed only once there is a left operand.
        result = Some(match result {
            None => value,
            Some(acc) => match pending.take() {
                Some(Op::Or) => acc || value,
                Some(Op::And) | None => acc && value,
            },
        });
    }

    result.unwrap_or(false)
}

fn matching_close(tokens: &[Token], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (offset, token) in tokens[open..].iter().enumerate() {
        match token {
            Token::Open => depth += 1,
            Token::Close => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + offset);
                }
            }
            _ => {}
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
