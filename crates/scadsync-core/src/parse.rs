use crate::model::{
    ParsedShape, ShapeKind, Unit, CYLINDER_RADIUS_FACTOR, SPHERE_RADIUS_FACTOR,
};
use once_cell::sync::Lazy;
use regex::Regex;

static CUBE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"cube\s*\(\s*\[([0-9.]+),\s*([0-9.]+),\s*([0-9.]+)\]\s*\)")
        .expect("cube pattern compiles")
});
static SPHERE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"sphere\s*\(\s*r\s*=\s*([0-9.]+)\s*\)").expect("sphere pattern compiles")
});
static CYLINDER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"cylinder\s*\(\s*r\s*=\s*([0-9.]+),\s*h\s*=\s*([0-9.]+)\s*\)")
        .expect("cylinder pattern compiles")
});

/// Scan text for the three bare solid statements.
///
/// Each kind is scanned independently and the results are concatenated by
/// kind (boxes, then spheres, then cylinders), so statement order across
/// kinds is not preserved. Numbers are taken as written, without any unit
/// conversion. A `difference()` shell is not understood here: its outer and
/// inner cubes are reported as two boxes, and shell spheres and cylinders
/// (which carry `$fn`) do not match at all.
pub fn scan_shapes(text: &str) -> Vec<ParsedShape> {
    let mut shapes = Vec::new();

    for caps in CUBE_RE.captures_iter(text) {
        if let Some(edge) = leading_number(&caps[1]) {
            shapes.push(ParsedShape::new(ShapeKind::Box, edge));
        }
    }
    for caps in SPHERE_RE.captures_iter(text) {
        if let Some(r) = leading_number(&caps[1]) {
            shapes.push(ParsedShape::new(ShapeKind::Sphere, r / SPHERE_RADIUS_FACTOR));
        }
    }
    for caps in CYLINDER_RE.captures_iter(text) {
        if let Some(r) = leading_number(&caps[1]) {
            shapes.push(ParsedShape::new(
                ShapeKind::Cylinder,
                r / CYLINDER_RADIUS_FACTOR,
            ));
        }
    }

    tracing::debug!(shapes = shapes.len(), "scanned script");
    shapes
}

/// Longest leading `digits[.digits]` prefix, so `"1.2.3"` reads as 1.2.
fn leading_number(s: &str) -> Option<f64> {
    let mut end = 0;
    let mut seen_dot = false;
    let mut seen_digit = false;
    for (i, ch) in s.char_indices() {
        match ch {
            '0'..='9' => {
                seen_digit = true;
                end = i + 1;
            }
            '.' if !seen_dot => {
                seen_dot = true;
                end = i + 1;
            }
            _ => break,
        }
    }
    if !seen_digit {
        return None;
    }
    s[..end].parse().ok()
}

/// Parse script text statement by statement, in document order.
///
/// A `difference()` block counts as one shape, taken from its first child,
/// which is how the shell output of the generator reads back. Transform and
/// grouping wrappers (`translate`, `rotate`, `union`, ...) are looked through
/// without applying them. Dimensions are divided by the unit factor before
/// the kind's base-size formula is inverted. Anything unrecognized is skipped.
pub fn parse_script(text: &str, unit: Unit) -> Vec<ParsedShape> {
    let tokens = Lexer::new(text).tokenize();
    let nodes = Parser::new(tokens).parse_all();

    let mut shapes = Vec::new();
    for node in &nodes {
        collect_shapes(node, unit.factor(), &mut shapes);
    }
    tracing::debug!(shapes = shapes.len(), unit = %unit, "parsed script");
    shapes
}

fn collect_shapes(node: &Node, factor: f64, out: &mut Vec<ParsedShape>) {
    if let Some(shape) = primitive_shape(node, factor) {
        out.push(shape);
        return;
    }
    match node.name.as_str() {
        "cube" | "sphere" | "cylinder" => {
            tracing::debug!(line = node.line, name = %node.name, "primitive without usable size");
        }
        "difference" => {
            let mut inner = Vec::new();
            if let Some(first) = node.children.first() {
                collect_shapes(first, factor, &mut inner);
            }
            if let Some(outer) = inner.into_iter().next() {
                out.push(outer);
            }
        }
        _ => {
            for child in &node.children {
                collect_shapes(child, factor, out);
            }
        }
    }
}

fn primitive_shape(node: &Node, factor: f64) -> Option<ParsedShape> {
    let (kind, size) = match node.name.as_str() {
        "cube" => {
            let size = node.arg("size", 0)?;
            let edge = match size {
                Value::Number(n) => *n,
                Value::Vector(items) => items.first()?.as_number()?,
                Value::Word => return None,
            };
            (ShapeKind::Box, edge)
        }
        "sphere" => {
            let r = match node.named("r").and_then(Value::as_number) {
                Some(r) => r,
                None => match node.named("d").and_then(Value::as_number) {
                    Some(d) => d * 0.5,
                    None => node.positional(0)?.as_number()?,
                },
            };
            (ShapeKind::Sphere, r / SPHERE_RADIUS_FACTOR)
        }
        "cylinder" => {
            let r = ["r", "r1"]
                .iter()
                .find_map(|name| node.named(name).and_then(Value::as_number))
                .or_else(|| {
                    ["d", "d1"]
                        .iter()
                        .find_map(|name| node.named(name).and_then(Value::as_number))
                        .map(|d| d * 0.5)
                })
                .or_else(|| node.positional(1).and_then(Value::as_number))?;
            (ShapeKind::Cylinder, r / CYLINDER_RADIUS_FACTOR)
        }
        _ => return None,
    };
    let scale = size / factor;
    if !scale.is_finite() || scale <= 0.0 {
        return None;
    }
    Some(ParsedShape::new(kind, scale))
}

#[derive(Debug, Clone, PartialEq)]
enum Value {
    Number(f64),
    Vector(Vec<Value>),
    /// A bare identifier such as `true` or a variable name.
    Word,
}

impl Value {
    fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Arg {
    name: Option<String>,
    value: Value,
}

/// One call statement with its child statements.
#[derive(Debug, Clone, PartialEq)]
struct Node {
    name: String,
    args: Vec<Arg>,
    children: Vec<Node>,
    line: usize,
}

impl Node {
    fn named(&self, name: &str) -> Option<&Value> {
        self.args
            .iter()
            .find(|a| a.name.as_deref() == Some(name))
            .map(|a| &a.value)
    }

    fn positional(&self, index: usize) -> Option<&Value> {
        self.args
            .iter()
            .filter(|a| a.name.is_none())
            .nth(index)
            .map(|a| &a.value)
    }

    fn arg(&self, name: &str, index: usize) -> Option<&Value> {
        self.named(name).or_else(|| self.positional(index))
    }
}

#[derive(Debug, Clone, PartialEq)]
enum TokenKind {
    Ident(String),
    Number(f64),
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Eq,
    Semi,
    Minus,
    Other,
    Eof,
}

#[derive(Debug, Clone)]
struct Token {
    kind: TokenKind,
    line: usize,
}

struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            chars: source.chars().peekable(),
            line: 1,
        }
    }

    fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        while let Some(ch) = self.bump() {
            let line = self.line;
            let kind = match ch {
                '\n' => {
                    self.line += 1;
                    continue;
                }
                c if c.is_whitespace() => continue,
                '/' if self.chars.peek() == Some(&'/') => {
                    self.skip_line_comment();
                    continue;
                }
                '/' if self.chars.peek() == Some(&'*') => {
                    self.bump();
                    self.skip_block_comment();
                    continue;
                }
                '(' => TokenKind::LParen,
                ')' => TokenKind::RParen,
                '[' => TokenKind::LBracket,
                ']' => TokenKind::RBracket,
                '{' => TokenKind::LBrace,
                '}' => TokenKind::RBrace,
                ',' => TokenKind::Comma,
                '=' => TokenKind::Eq,
                ';' => TokenKind::Semi,
                '-' => TokenKind::Minus,
                c if c.is_ascii_digit()
                    || (c == '.' && self.chars.peek().is_some_and(|n| n.is_ascii_digit())) =>
                {
                    self.lex_number(c)
                }
                c if c == '$' || c == '_' || c.is_ascii_alphabetic() => self.lex_ident(c),
                _ => TokenKind::Other,
            };
            tokens.push(Token { kind, line });
        }
        tokens.push(Token {
            kind: TokenKind::Eof,
            line: self.line,
        });
        tokens
    }

    fn bump(&mut self) -> Option<char> {
        self.chars.next()
    }

    fn skip_line_comment(&mut self) {
        while let Some(&ch) = self.chars.peek() {
            if ch == '\n' {
                break;
            }
            self.bump();
        }
    }

    fn skip_block_comment(&mut self) {
        let mut prev = '\0';
        while let Some(ch) = self.bump() {
            if ch == '\n' {
                self.line += 1;
            }
            if prev == '*' && ch == '/' {
                return;
            }
            prev = ch;
        }
    }

    fn lex_number(&mut self, first: char) -> TokenKind {
        let mut text = String::from(first);
        let mut seen_dot = first == '.';
        let mut seen_exp = false;
        while let Some(&ch) = self.chars.peek() {
            match ch {
                '0'..='9' => text.push(ch),
                '.' if !seen_dot && !seen_exp => {
                    seen_dot = true;
                    text.push(ch);
                }
                'e' | 'E' if !seen_exp => {
                    seen_exp = true;
                    text.push(ch);
                    self.bump();
                    if let Some(&sign) = self.chars.peek() {
                        if sign == '+' || sign == '-' {
                            text.push(sign);
                            self.bump();
                        }
                    }
                    continue;
                }
                _ => break,
            }
            self.bump();
        }
        match text.parse() {
            Ok(v) => TokenKind::Number(v),
            Err(_) => TokenKind::Other,
        }
    }

    fn lex_ident(&mut self, first: char) -> TokenKind {
        let mut text = String::from(first);
        while let Some(&ch) = self.chars.peek() {
            if ch == '_' || ch.is_ascii_alphanumeric() {
                text.push(ch);
                self.bump();
            } else {
                break;
            }
        }
        TokenKind::Ident(text)
    }
}

/// Why a statement was skipped; only ever logged.
#[derive(Debug)]
struct Skip {
    message: &'static str,
    line: usize,
}

type Parsed<T> = Result<T, Skip>;

/// Deepest block, call-chain or vector nesting the parser descends into.
const MAX_DEPTH: usize = 256;

struct Parser {
    tokens: Vec<Token>,
    index: usize,
    depth: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            index: 0,
            depth: 0,
        }
    }

    /// Run `f` one nesting level deeper, failing once `MAX_DEPTH` is reached.
    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> Parsed<T>) -> Parsed<T> {
        if self.depth >= MAX_DEPTH {
            return Err(self.skip("nesting too deep"));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    fn parse_all(&mut self) -> Vec<Node> {
        let mut nodes = Vec::new();
        while !self.check(&TokenKind::Eof) {
            if self.check(&TokenKind::RBrace) {
                // Stray closer at top level.
                self.advance();
                continue;
            }
            self.statement_into(&mut nodes);
        }
        nodes
    }

    /// Parse one statement, recovering by skipping it when it is not a call.
    fn statement_into(&mut self, out: &mut Vec<Node>) {
        let start = self.index;
        match self.statement(out) {
            Ok(()) => {}
            Err(skip) => {
                tracing::debug!(line = skip.line, reason = skip.message, "skipping statement");
                self.index = start;
                self.skip_statement();
            }
        }
    }

    fn statement(&mut self, out: &mut Vec<Node>) -> Parsed<()> {
        match self.peek().kind.clone() {
            TokenKind::Semi => {
                self.advance();
                Ok(())
            }
            TokenKind::LBrace => {
                self.advance();
                out.extend(self.nested(Self::block_body)?);
                Ok(())
            }
            TokenKind::Ident(name) if self.peek_n_is(1, &TokenKind::LParen) => {
                let line = self.peek().line;
                self.advance();
                self.advance();
                let args = self.args()?;
                let children = self.children()?;
                out.push(Node {
                    name,
                    args,
                    children,
                    line,
                });
                Ok(())
            }
            _ => Err(self.skip("not a call statement")),
        }
    }

    /// Statements up to the closing brace, which is consumed.
    fn block_body(&mut self) -> Parsed<Vec<Node>> {
        let mut nodes = Vec::new();
        loop {
            if self.check(&TokenKind::RBrace) {
                self.advance();
                return Ok(nodes);
            }
            if self.check(&TokenKind::Eof) {
                return Err(self.skip("unterminated block"));
            }
            self.statement_into(&mut nodes);
        }
    }

    fn children(&mut self) -> Parsed<Vec<Node>> {
        match self.peek().kind {
            TokenKind::Semi => {
                self.advance();
                Ok(Vec::new())
            }
            TokenKind::Eof => Ok(Vec::new()),
            TokenKind::LBrace => {
                self.advance();
                self.nested(Self::block_body)
            }
            _ => self.nested(|p| {
                let mut nodes = Vec::new();
                p.statement(&mut nodes)?;
                Ok(nodes)
            }),
        }
    }

    fn args(&mut self) -> Parsed<Vec<Arg>> {
        let mut args = Vec::new();
        if self.match_kind(&TokenKind::RParen) {
            return Ok(args);
        }
        loop {
            let name = match self.peek().kind.clone() {
                TokenKind::Ident(name) if self.peek_n_is(1, &TokenKind::Eq) => {
                    self.advance();
                    self.advance();
                    Some(name)
                }
                _ => None,
            };
            let value = self.value()?;
            args.push(Arg { name, value });

            if self.match_kind(&TokenKind::Comma) {
                continue;
            }
            if self.match_kind(&TokenKind::RParen) {
                return Ok(args);
            }
            return Err(self.skip("expected ',' or ')' in argument list"));
        }
    }

    fn value(&mut self) -> Parsed<Value> {
        match self.peek().kind.clone() {
            TokenKind::Number(n) => {
                self.advance();
                Ok(Value::Number(n))
            }
            TokenKind::Minus => {
                self.advance();
                match self.peek().kind {
                    TokenKind::Number(n) => {
                        self.advance();
                        Ok(Value::Number(-n))
                    }
                    _ => Err(self.skip("expected number after '-'")),
                }
            }
            TokenKind::Ident(_) => {
                self.advance();
                Ok(Value::Word)
            }
            TokenKind::LBracket => {
                self.advance();
                self.nested(Self::vector_items)
            }
            _ => Err(self.skip("unsupported argument value")),
        }
    }

    /// Vector elements after the opening bracket, up to the consumed `]`.
    fn vector_items(&mut self) -> Parsed<Value> {
        let mut items = Vec::new();
        if self.match_kind(&TokenKind::RBracket) {
            return Ok(Value::Vector(items));
        }
        loop {
            items.push(self.value()?);
            if self.match_kind(&TokenKind::Comma) {
                continue;
            }
            if self.match_kind(&TokenKind::RBracket) {
                return Ok(Value::Vector(items));
            }
            return Err(self.skip("expected ',' or ']' in vector"));
        }
    }

    /// Skip to the end of the current statement: a `;` or a closed `{}` block
    /// at nesting depth zero.
    fn skip_statement(&mut self) {
        let mut depth = 0usize;
        loop {
            match self.peek().kind {
                TokenKind::Eof => return,
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => depth += 1,
                TokenKind::RParen | TokenKind::RBracket => depth = depth.saturating_sub(1),
                TokenKind::RBrace => {
                    if depth == 0 {
                        // Belongs to an enclosing block.
                        return;
                    }
                    depth -= 1;
                    if depth == 0 {
                        self.advance();
                        return;
                    }
                }
                TokenKind::Semi if depth == 0 => {
                    self.advance();
                    return;
                }
                _ => {}
            }
            self.advance();
        }
    }

    fn skip(&self, message: &'static str) -> Skip {
        Skip {
            message,
            line: self.peek().line,
        }
    }

    fn peek(&self) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[self.index.min(last)]
    }

    fn peek_n_is(&self, n: usize, kind: &TokenKind) -> bool {
        self.tokens
            .get(self.index + n)
            .is_some_and(|t| &t.kind == kind)
    }

    fn check(&self, kind: &TokenKind) -> bool {
        &self.peek().kind == kind
    }

    fn match_kind(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn advance(&mut self) {
        if self.index < self.tokens.len() - 1 {
            self.index += 1;
        }
    }
}
