//! Notation parser — tokenizer, syntax tree types, and recursive descent parser
//!
//! Converts notation text into a [`Component`] tree.
//!
//! Every production is a `parse_*` method returning `Result<Option<T>>`:
//! `Ok(None)` means "not this alternative" and leaves the token stream where
//! it was, `Err` means a production committed to its introducing token and
//! then failed, which aborts the whole parse. Backtracking uses two stacks:
//! tokens already consumed, and tokens pushed back to be read again.

pub mod ast;
pub mod grammar;
pub mod tokenizer;

use serde::Deserialize;
use tracing::{debug, trace};

use crate::collections::{Catalog, Extent, List, Range};
use crate::elements::Symbol;
use crate::error::source_excerpt;
use crate::strings::Text;
use crate::{Error, Result};
use ast::{Collection, Component, Context, Element, Entity, Primitive, Procedure};
use tokenizer::{Span, Token, TokenKind, Tokenizer};

/// Parser limits
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Deepest nesting of collections, contexts and procedures accepted
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions { max_depth: 64 }
    }
}

/// Recursive descent parser over a lazy token stream
pub struct Parser<'a> {
    source: &'a str,
    tokens: Tokenizer<'a>,
    consumed: Vec<Token>,
    putback: Vec<Token>,
    rules: Vec<&'static str>,
    depth: usize,
    options: ParseOptions,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str, options: ParseOptions) -> Self {
        Parser {
            source,
            tokens: Tokenizer::new(source),
            consumed: Vec::new(),
            putback: Vec::new(),
            rules: Vec::new(),
            depth: 0,
            options,
        }
    }

    // ── Token stacks ───────────────────────────────────

    /// Next significant token; comments are skipped and an error token is fatal
    fn next_token(&mut self) -> Result<Token> {
        let token = match self.putback.pop() {
            Some(token) => token,
            None => loop {
                match self.tokens.next() {
                    Some(token) if token.kind == TokenKind::Comment => continue,
                    Some(token) => break token,
                    None => break self.end_of_input(),
                }
            },
        };
        if token.kind == TokenKind::Error {
            let character = token.text.chars().next().unwrap_or('\u{FFFD}');
            return Err(Error::LexicalError {
                character,
                line: token.span.line,
                column: token.span.column,
                excerpt: source_excerpt(self.source, token.span.line, token.span.column),
            });
        }
        self.consumed.push(token.clone());
        Ok(token)
    }

    fn end_of_input(&self) -> Token {
        let span = match self.consumed.last() {
            Some(last) if last.kind == TokenKind::Eof => last.span,
            _ => {
                let line = self.source.matches('\n').count() + 1;
                let column = self.source.rsplit('\n').next().map_or(0, |l| l.chars().count()) + 1;
                Span {
                    line,
                    column,
                    offset: self.source.len(),
                }
            }
        };
        Token {
            kind: TokenKind::Eof,
            text: String::new(),
            span,
        }
    }

    /// Push the most recently consumed token back onto the stream
    fn backup_one(&mut self) {
        if let Some(token) = self.consumed.pop() {
            trace!(token = %token, "backtrack");
            self.putback.push(token);
        }
    }

    fn mark(&self) -> usize {
        self.consumed.len()
    }

    fn backup_to(&mut self, mark: usize) {
        while self.consumed.len() > mark {
            self.backup_one();
        }
    }

    fn try_kind(&mut self, kind: TokenKind) -> Result<Option<Token>> {
        let token = self.next_token()?;
        if token.kind == kind {
            Ok(Some(token))
        } else {
            self.backup_one();
            Ok(None)
        }
    }

    fn try_delimiter(&mut self, text: &str) -> Result<bool> {
        let token = self.next_token()?;
        if token.is_delimiter(text) {
            Ok(true)
        } else {
            self.backup_one();
            Ok(false)
        }
    }

    fn expect_delimiter(&mut self, text: &str) -> Result<Token> {
        let token = self.next_token()?;
        if token.is_delimiter(text) {
            Ok(token)
        } else {
            Err(self.syntax_error(&format!("'{}'", text), &token))
        }
    }

    fn expect_kind(&mut self, kind: TokenKind) -> Result<Token> {
        let token = self.next_token()?;
        if token.kind == kind {
            Ok(token)
        } else {
            Err(self.syntax_error(&kind.to_string(), &token))
        }
    }

    /// Skip blank lines between the items of a multi-line sequence
    fn skip_blank_lines(&mut self) -> Result<()> {
        while self.try_kind(TokenKind::Eol)?.is_some() {}
        Ok(())
    }

    // ── Errors ─────────────────────────────────────────

    fn syntax_error(&self, expected: &str, found: &Token) -> Error {
        let rule = self.rules.last().copied().unwrap_or("source");
        let mut excerpt = source_excerpt(self.source, found.span.line, found.span.column);
        excerpt.push_str(&grammar::describe(rule));
        Error::SyntaxError {
            expected: expected.to_string(),
            found: found.to_string(),
            line: found.span.line,
            column: found.span.column,
            rules: self.rules.iter().map(|r| r.to_string()).collect(),
            excerpt,
        }
    }

    /// A syntax error at whatever token comes next
    fn expected(&mut self, what: &str) -> Error {
        match self.next_token() {
            Ok(token) => self.syntax_error(what, &token),
            Err(error) => error,
        }
    }

    fn within<T>(
        &mut self,
        rule: &'static str,
        production: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        self.rules.push(rule);
        let result = production(self);
        self.rules.pop();
        result
    }

    fn enter_level(&mut self, opener: &Token) -> Result<()> {
        if self.depth >= self.options.max_depth {
            return Err(self.syntax_error(
                &format!("nesting no deeper than {}", self.options.max_depth),
                opener,
            ));
        }
        self.depth += 1;
        Ok(())
    }

    fn exit_level(&mut self) {
        self.depth -= 1;
    }

    // ── Entry points ───────────────────────────────────

    /// `source = component EOF`
    pub fn parse_source(&mut self) -> Result<Component> {
        debug!(length = self.source.len(), "parsing source");
        let component = self.within("source", |p| {
            let component = p.parse_component()?.ok_or_else(|| p.expected("component"))?;
            p.expect_kind(TokenKind::Eof)?;
            Ok(component)
        })?;
        debug!(tokens = self.consumed.len(), "parsed source");
        Ok(component)
    }

    /// `document = component EOL EOF`
    pub fn parse_document(&mut self) -> Result<Component> {
        debug!(length = self.source.len(), "parsing document");
        let component = self.within("document", |p| {
            let component = p.parse_component()?.ok_or_else(|| p.expected("component"))?;
            p.expect_kind(TokenKind::Eol)?;
            p.expect_kind(TokenKind::Eof)?;
            Ok(component)
        })?;
        debug!(tokens = self.consumed.len(), "parsed document");
        Ok(component)
    }

    // ── Component ──────────────────────────────────────

    fn parse_component(&mut self) -> Result<Option<Component>> {
        self.within("component", |p| {
            let Some(entity) = p.parse_entity()? else {
                return Ok(None);
            };
            let context = p.parse_context()?;
            let note = p.parse_note()?;
            Ok(Some(Component {
                entity,
                context,
                note,
            }))
        })
    }

    fn parse_entity(&mut self) -> Result<Option<Entity>> {
        if let Some(element) = self.parse_element()? {
            return Ok(Some(Entity::Element(element)));
        }
        if let Some(text) = self.parse_string()? {
            return Ok(Some(Entity::Text(text)));
        }
        if let Some(collection) = self.parse_collection()? {
            return Ok(Some(Entity::Collection(collection)));
        }
        if let Some(procedure) = self.parse_procedure()? {
            return Ok(Some(Entity::Procedure(procedure)));
        }
        Ok(None)
    }

    fn parse_note(&mut self) -> Result<Option<String>> {
        Ok(self
            .try_kind(TokenKind::Note)?
            .and_then(|token| ast::note_text(&token.text)))
    }

    // ── Primitives ─────────────────────────────────────

    fn parse_element(&mut self) -> Result<Option<Element>> {
        let token = self.next_token()?;
        if !Element::is_element_token(token.kind) {
            self.backup_one();
            return Ok(None);
        }
        Element::from_token(token.kind, &token.text)
            .map(Some)
            .map_err(|e| self.invalid_literal(e, &token))
    }

    fn parse_string(&mut self) -> Result<Option<Text>> {
        let token = self.next_token()?;
        let text = match token.kind {
            TokenKind::Binary => token.text.parse().map(Text::Binary),
            TokenKind::Name => Text::from_name_token(&token.text),
            TokenKind::Narrative => token.text.parse().map(Text::Narrative),
            TokenKind::Quote => token.text.parse().map(Text::Quote),
            TokenKind::Version => token.text.parse().map(Text::Version),
            _ => {
                self.backup_one();
                return Ok(None);
            }
        };
        text.map(Some).map_err(|e| self.invalid_literal(e, &token))
    }

    fn parse_primitive(&mut self) -> Result<Option<Primitive>> {
        self.within("primitive", |p| {
            if let Some(element) = p.parse_element()? {
                return Ok(Some(Primitive::Element(element)));
            }
            Ok(p.parse_string()?.map(Primitive::Text))
        })
    }

    /// A literal that tokenized but failed validation is reported at its token
    fn invalid_literal(&self, error: Error, token: &Token) -> Error {
        let reason = match error {
            Error::ValueError { kind, reason, .. } => format!("a valid {} ({})", kind, reason),
            other => other.to_string(),
        };
        self.syntax_error(&reason, token)
    }

    // ── Context ────────────────────────────────────────

    fn parse_context(&mut self) -> Result<Option<Context>> {
        let token = self.next_token()?;
        if !token.is_delimiter("(") {
            self.backup_one();
            return Ok(None);
        }
        self.enter_level(&token)?;
        let context = self.within("context", |p| {
            let parameters = p.parse_parameters()?;
            p.expect_delimiter(")")?;
            Ok(parameters)
        })?;
        self.exit_level();
        Ok(Some(context))
    }

    fn parse_parameters(&mut self) -> Result<Context> {
        self.within("parameters", |p| {
            let mut context = Context::new();
            if p.try_kind(TokenKind::Eol)?.is_some() {
                p.skip_blank_lines()?;
                let mut count = 0;
                while let Some((symbol, value)) = p.parse_parameter()? {
                    context.put(symbol, value);
                    count += 1;
                    p.expect_kind(TokenKind::Eol)?;
                    p.skip_blank_lines()?;
                }
                if count == 0 {
                    return Err(p.expected("parameter"));
                }
            } else {
                loop {
                    let (symbol, value) =
                        p.parse_parameter()?.ok_or_else(|| p.expected("parameter"))?;
                    context.put(symbol, value);
                    if !p.try_delimiter(",")? {
                        break;
                    }
                }
            }
            Ok(context)
        })
    }

    fn parse_parameter(&mut self) -> Result<Option<(Symbol, Component)>> {
        self.within("parameter", |p| {
            let Some(token) = p.try_kind(TokenKind::Symbol)? else {
                return Ok(None);
            };
            let symbol = token
                .text
                .parse()
                .map_err(|e| p.invalid_literal(e, &token))?;
            p.expect_delimiter(":")?;
            let value = p.parse_component()?.ok_or_else(|| p.expected("component"))?;
            Ok(Some((symbol, value)))
        })
    }

    // ── Collections ────────────────────────────────────

    fn parse_collection(&mut self) -> Result<Option<Collection>> {
        let token = self.next_token()?;
        if !token.is_delimiter("[") {
            self.backup_one();
            return Ok(None);
        }
        self.enter_level(&token)?;
        let collection = self.within("collection", |p| {
            let collection = if let Some(catalog) = p.parse_catalog()? {
                Collection::Catalog(catalog)
            } else if let Some(range) = p.parse_range()? {
                Collection::Range(range)
            } else {
                Collection::List(p.parse_list()?)
            };
            p.expect_delimiter("]")?;
            Ok(collection)
        })?;
        self.exit_level();
        Ok(Some(collection))
    }

    fn parse_catalog(&mut self) -> Result<Option<Catalog<Primitive, Component>>> {
        self.within("catalog", |p| {
            let start = p.mark();
            let mut catalog = Catalog::new();
            if p.try_delimiter(":")? {
                return Ok(Some(catalog));
            }
            if p.try_kind(TokenKind::Eol)?.is_some() {
                p.skip_blank_lines()?;
                let Some((key, value)) = p.parse_association()? else {
                    p.backup_to(start);
                    return Ok(None);
                };
                catalog.put(key, value);
                p.expect_kind(TokenKind::Eol)?;
                p.skip_blank_lines()?;
                while let Some((key, value)) = p.parse_association()? {
                    catalog.put(key, value);
                    p.expect_kind(TokenKind::Eol)?;
                    p.skip_blank_lines()?;
                }
            } else {
                let Some((key, value)) = p.parse_association()? else {
                    p.backup_to(start);
                    return Ok(None);
                };
                catalog.put(key, value);
                while p.try_delimiter(",")? {
                    let (key, value) =
                        p.parse_association()?.ok_or_else(|| p.expected("association"))?;
                    catalog.put(key, value);
                }
            }
            Ok(Some(catalog))
        })
    }

    /// `primitive ':' component`; a primitive without a colon is not an association
    fn parse_association(&mut self) -> Result<Option<(Primitive, Component)>> {
        self.within("association", |p| {
            let start = p.mark();
            let Some(key) = p.parse_primitive()? else {
                return Ok(None);
            };
            if !p.try_delimiter(":")? {
                p.backup_to(start);
                return Ok(None);
            }
            let value = p.parse_component()?.ok_or_else(|| p.expected("component"))?;
            Ok(Some((key, value)))
        })
    }

    fn parse_range(&mut self) -> Result<Option<Range<Primitive>>> {
        self.within("range", |p| {
            let start = p.mark();
            let first = p.parse_primitive()?;
            let token = p.next_token()?;
            let extent = match token.kind {
                TokenKind::Delimiter => Extent::from_delimiter(&token.text),
                _ => None,
            };
            let Some(extent) = extent else {
                p.backup_to(start);
                return Ok(None);
            };
            let last = p.parse_primitive()?;
            Ok(Some(Range::new(first, extent, last)))
        })
    }

    fn parse_list(&mut self) -> Result<List<Component>> {
        self.within("list", |p| {
            let mut list = List::new();
            if p.try_delimiter("]")? {
                p.backup_one();
                return Ok(list);
            }
            if p.try_kind(TokenKind::Eol)?.is_some() {
                p.skip_blank_lines()?;
                while let Some(component) = p.parse_component()? {
                    list.append(component);
                    p.expect_kind(TokenKind::Eol)?;
                    p.skip_blank_lines()?;
                }
            } else {
                loop {
                    let component = p.parse_component()?.ok_or_else(|| p.expected("component"))?;
                    list.append(component);
                    if !p.try_delimiter(",")? {
                        break;
                    }
                }
            }
            Ok(list)
        })
    }

    // ── Procedure ──────────────────────────────────────

    fn parse_procedure(&mut self) -> Result<Option<Procedure>> {
        let token = self.next_token()?;
        if !token.is_delimiter("{") {
            self.backup_one();
            return Ok(None);
        }
        self.enter_level(&token)?;
        let procedure = self.within("procedure", |p| {
            let mut statements = Vec::new();
            let mut current: Option<(usize, usize)> = None;
            let mut nesting = 0usize;
            loop {
                let token = p.next_token()?;
                let boundary = nesting == 0
                    && (token.kind == TokenKind::Eol || token.is_delimiter(";"));
                if token.kind == TokenKind::Eof || (nesting == 0 && token.is_delimiter("}")) {
                    if token.kind == TokenKind::Eof {
                        return Err(p.syntax_error("'}'", &token));
                    }
                    p.close_statement(&mut statements, current.take());
                    break;
                }
                if boundary {
                    p.close_statement(&mut statements, current.take());
                    continue;
                }
                if token.is_delimiter("{") {
                    nesting += 1;
                } else if token.is_delimiter("}") {
                    nesting -= 1;
                }
                current = Some(match current {
                    Some((start, _)) => (start, token.end()),
                    None => (token.span.offset, token.end()),
                });
            }
            Ok(Procedure { statements })
        })?;
        self.exit_level();
        Ok(Some(procedure))
    }

    fn close_statement(&self, statements: &mut Vec<String>, range: Option<(usize, usize)>) {
        if let Some((start, end)) = range {
            let text = self.source[start..end].trim();
            if !text.is_empty() {
                statements.push(text.to_string());
            }
        }
    }
}

// ── Public API ────────────────────────────────────────────

/// Parse source text that holds exactly one component
///
/// # Errors
/// Returns `LexicalError` or `SyntaxError` with line:column and an excerpt.
///
/// # Example
/// ```
/// let component = bdn_core::parse_source("[$foo, $bar, $baz]").unwrap();
/// assert_eq!(component.as_list().unwrap().size(), 3);
/// ```
pub fn parse_source(source: &str) -> Result<Component> {
    parse_source_with_options(source, &ParseOptions::default())
}

pub fn parse_source_with_options(source: &str, options: &ParseOptions) -> Result<Component> {
    Parser::new(source, options.clone()).parse_source()
}

/// Parse a document: one component followed by a final end of line
pub fn parse_document(bytes: &[u8]) -> Result<Component> {
    parse_document_with_options(bytes, &ParseOptions::default())
}

pub fn parse_document_with_options(bytes: &[u8], options: &ParseOptions) -> Result<Component> {
    let source = std::str::from_utf8(bytes).map_err(|e| {
        let valid = String::from_utf8_lossy(&bytes[..e.valid_up_to()]).into_owned();
        let line = valid.matches('\n').count() + 1;
        let column = valid.rsplit('\n').next().map_or(0, |l| l.chars().count()) + 1;
        let whole = String::from_utf8_lossy(bytes);
        Error::LexicalError {
            character: '\u{FFFD}',
            line,
            column,
            excerpt: source_excerpt(&whole, line, column),
        }
    })?;
    Parser::new(source, options.clone()).parse_document()
}
