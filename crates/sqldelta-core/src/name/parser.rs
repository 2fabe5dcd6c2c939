//! Hand-written scanner for SQL object names.
//!
//! Accepts bare identifiers, quoted identifiers (with doubled-quote
//! escaping), and dotted `qualifier.identifier` forms. The parser is strict
//! and total; lenient degrade-with-warning behavior lives at the entity
//! seams that consume raw introspection data.

use std::iter::Peekable;
use std::str::CharIndices;

use crate::error::ParseError;
use crate::name::{Identifier, OptionallyQualifiedName, UnqualifiedName};

/// Parses an unqualified name: exactly one identifier, no qualifier.
///
/// # Errors
///
/// Returns [`ParseError::TooManyQualifiers`] if the input carries a
/// qualifier, or the underlying scan error for malformed identifiers.
pub fn parse_unqualified(input: &str) -> Result<UnqualifiedName, ParseError> {
    let mut scanner = Scanner::new(input);
    let identifier = scanner.scan_identifier()?;

    match scanner.peek() {
        None => Ok(UnqualifiedName::new(identifier)),
        Some('.') => Err(ParseError::TooManyQualifiers {
            input: input.to_owned(),
        }),
        Some(_) => Err(scanner.trailing_input()),
    }
}

/// Parses an optionally qualified name: one identifier, optionally preceded
/// by a single qualifier level.
///
/// # Errors
///
/// Returns [`ParseError::TooManyQualifiers`] for more than one qualifier
/// level, or the underlying scan error for malformed identifiers.
pub fn parse_optionally_qualified(input: &str) -> Result<OptionallyQualifiedName, ParseError> {
    let mut scanner = Scanner::new(input);
    let first = scanner.scan_identifier()?;

    match scanner.peek() {
        None => Ok(OptionallyQualifiedName::new(first, None)),
        Some('.') => {
            scanner.advance();
            let second = scanner.scan_identifier()?;
            match scanner.peek() {
                None => Ok(OptionallyQualifiedName::new(second, Some(first))),
                Some('.') => Err(ParseError::TooManyQualifiers {
                    input: input.to_owned(),
                }),
                Some(_) => Err(scanner.trailing_input()),
            }
        }
        Some(_) => Err(scanner.trailing_input()),
    }
}

struct Scanner<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    fn advance(&mut self) -> Option<(usize, char)> {
        self.chars.next()
    }

    fn trailing_input(&self) -> ParseError {
        ParseError::TrailingInput {
            input: self.input.to_owned(),
        }
    }

    fn scan_identifier(&mut self) -> Result<Identifier, ParseError> {
        match self.peek() {
            Some('"') => self.scan_quoted(),
            Some(_) => self.scan_unquoted(),
            None => Err(ParseError::EmptyIdentifier),
        }
    }

    fn scan_quoted(&mut self) -> Result<Identifier, ParseError> {
        self.advance();

        let mut value = String::new();
        loop {
            match self.advance() {
                Some((_, '"')) => {
                    // A doubled quote is an escaped quote character; a lone
                    // closing quote terminates the identifier.
                    if self.peek() == Some('"') {
                        self.advance();
                        value.push('"');
                    } else {
                        return Identifier::quoted(value);
                    }
                }
                Some((_, c)) => value.push(c),
                None => {
                    return Err(ParseError::UnterminatedQuote {
                        input: self.input.to_owned(),
                    })
                }
            }
        }
    }

    fn scan_unquoted(&mut self) -> Result<Identifier, ParseError> {
        let mut value = String::new();
        while let Some(c) = self.peek() {
            if c == '.' {
                break;
            }
            if c.is_alphanumeric() || c == '_' || c == '$' {
                value.push(c);
                self.advance();
            } else {
                let (position, character) = self.advance().unwrap_or((self.input.len(), c));
                return Err(ParseError::UnexpectedCharacter {
                    input: self.input.to_owned(),
                    character,
                    position,
                });
            }
        }
        Identifier::unquoted(value)
    }
}
