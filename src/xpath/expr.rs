use std::fmt;

use crate::error::LocatorError;

/// A parsed structural path: an absolute location path over element steps.
#[derive(Debug, Clone, PartialEq)]
pub struct XPath {
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// `/`
    Child,
    /// `//`
    Descendant,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NameTest {
    Any,
    Tag(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `[3]`, 1-based
    Position(usize),
    /// `[@name]`
    HasAttribute(String),
    /// `[@name="value"]`
    AttributeEquals(String, String),
    /// `[contains(@name,"value")]`
    AttributeContains(String, String),
    /// `[contains(concat(" ",normalize-space(@name)," ")," token ")]`,
    /// a whole whitespace-separated token
    AttributeToken(String, String),
    /// `[text()="value"]`, own text, whitespace-normalized
    TextEquals(String),
    /// `[contains(text(),"value")]`
    TextContains(String),
    /// `[normalize-space()="value"]`, full text content
    NormalizedTextEquals(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub axis: Axis,
    pub name: NameTest,
    pub predicates: Vec<Predicate>,
}

impl Step {
    pub fn new(axis: Axis, tag: &str) -> Self {
        Self {
            axis,
            name: NameTest::Tag(tag.to_lowercase()),
            predicates: Vec::new(),
        }
    }

    pub fn with(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }
}

impl XPath {
    pub fn parse(expression: &str) -> Result<Self, LocatorError> {
        Parser::new(expression).parse()
    }
}

// ============================================================================
// Rendering
// ============================================================================

/// Render a string literal. Values holding both quote kinds become a
/// `concat()` of single-quote-free pieces.
pub fn render_literal(value: &str) -> String {
    if !value.contains('"') {
        format!("\"{}\"", value)
    } else if !value.contains('\'') {
        format!("'{}'", value)
    } else {
        let parts: Vec<String> = value.split('"').map(|p| format!("\"{}\"", p)).collect();
        format!("concat({})", parts.join(", '\"', "))
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Position(n) => write!(f, "[{}]", n),
            Predicate::HasAttribute(a) => write!(f, "[@{}]", a),
            Predicate::AttributeEquals(a, v) => write!(f, "[@{}={}]", a, render_literal(v)),
            Predicate::AttributeContains(a, v) => {
                write!(f, "[contains(@{},{})]", a, render_literal(v))
            }
            Predicate::AttributeToken(a, v) => write!(
                f,
                "[contains(concat(\" \",normalize-space(@{}),\" \"),{})]",
                a,
                render_literal(&format!(" {} ", v))
            ),
            Predicate::TextEquals(v) => write!(f, "[text()={}]", render_literal(v)),
            Predicate::TextContains(v) => write!(f, "[contains(text(),{})]", render_literal(v)),
            Predicate::NormalizedTextEquals(v) => {
                write!(f, "[normalize-space()={}]", render_literal(v))
            }
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.axis {
            Axis::Child => write!(f, "/")?,
            Axis::Descendant => write!(f, "//")?,
        }
        match &self.name {
            NameTest::Any => write!(f, "*")?,
            NameTest::Tag(t) => write!(f, "{}", t)?,
        }
        for p in &self.predicates {
            write!(f, "{}", p)?;
        }
        Ok(())
    }
}

impl fmt::Display for XPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for step in &self.steps {
            write!(f, "{}", step)?;
        }
        Ok(())
    }
}

// ============================================================================
// Parsing
// ============================================================================

struct Parser<'a> {
    source: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.trim().chars().collect(),
            pos: 0,
        }
    }

    fn error(&self, message: impl Into<String>) -> LocatorError {
        LocatorError::XPathSyntax {
            expression: self.source.to_string(),
            position: self.pos,
            message: message.into(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, c: char) -> Result<(), LocatorError> {
        self.skip_ws();
        if self.eat(c) {
            Ok(())
        } else {
            Err(self.error(format!("expected '{}'", c)))
        }
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        let kw: Vec<char> = keyword.chars().collect();
        if self.chars[self.pos..].starts_with(&kw) {
            self.pos += kw.len();
            true
        } else {
            false
        }
    }

    fn parse(mut self) -> Result<XPath, LocatorError> {
        if self.chars.is_empty() {
            return Err(self.error("empty expression"));
        }

        let mut steps = Vec::new();
        while self.pos < self.chars.len() {
            let axis = if self.eat_keyword("//") {
                Axis::Descendant
            } else if self.eat('/') {
                Axis::Child
            } else {
                return Err(self.error("expected '/' or '//'"));
            };
            steps.push(self.parse_step(axis)?);
        }
        Ok(XPath { steps })
    }

    fn parse_step(&mut self, axis: Axis) -> Result<Step, LocatorError> {
        let name = if self.eat('*') {
            NameTest::Any
        } else {
            let name = self.parse_name();
            if name.is_empty() {
                return Err(self.error("expected element name"));
            }
            NameTest::Tag(name.to_lowercase())
        };

        let mut predicates = Vec::new();
        while self.eat('[') {
            self.skip_ws();
            predicates.push(self.parse_predicate()?);
            self.expect(']')?;
        }

        Ok(Step {
            axis,
            name,
            predicates,
        })
    }

    fn parse_name(&mut self) -> String {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'))
        {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }

    fn parse_predicate(&mut self) -> Result<Predicate, LocatorError> {
        if self.peek().is_some_and(|c| c.is_ascii_digit()) {
            let start = self.pos;
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.pos += 1;
            }
            let digits: String = self.chars[start..self.pos].iter().collect();
            let n: usize = digits.parse().map_err(|_| self.error("position out of range"))?;
            if n == 0 {
                return Err(self.error("positions are 1-based"));
            }
            return Ok(Predicate::Position(n));
        }

        if self.eat('@') {
            let attr = self.parse_attr_name()?;
            self.skip_ws();
            if self.eat('=') {
                let value = self.parse_string()?;
                return Ok(Predicate::AttributeEquals(attr, value));
            }
            return Ok(Predicate::HasAttribute(attr));
        }

        if self.eat_keyword("contains") {
            self.expect('(')?;
            self.skip_ws();
            if self.eat_keyword("concat") {
                return self.parse_token_test();
            }
            let target = if self.eat('@') {
                Some(self.parse_attr_name()?)
            } else if self.eat_keyword("text()") {
                None
            } else {
                return Err(self.error("contains() takes @attribute or text()"));
            };
            self.expect(',')?;
            let value = self.parse_string()?;
            self.expect(')')?;
            return Ok(match target {
                Some(attr) => Predicate::AttributeContains(attr, value),
                None => Predicate::TextContains(value),
            });
        }

        if self.eat_keyword("text()") {
            self.expect('=')?;
            return Ok(Predicate::TextEquals(self.parse_string()?));
        }

        if self.eat_keyword("normalize-space()") || self.eat_keyword("normalize-space(.)") {
            self.expect('=')?;
            return Ok(Predicate::NormalizedTextEquals(self.parse_string()?));
        }

        Err(self.error("unsupported predicate"))
    }

    /// The rest of `contains(concat(" ",normalize-space(@a)," "),LIT)`
    /// once `contains(concat` has been consumed. LIT must be a single token
    /// padded by one space on each side.
    fn parse_token_test(&mut self) -> Result<Predicate, LocatorError> {
        self.expect('(')?;
        self.expect_space_literal()?;
        self.expect(',')?;
        self.skip_ws();
        if !self.eat_keyword("normalize-space(") {
            return Err(self.error("expected normalize-space(@attribute)"));
        }
        self.expect('@')?;
        let attr = self.parse_attr_name()?;
        self.expect(')')?;
        self.expect(',')?;
        self.expect_space_literal()?;
        self.expect(')')?;
        self.expect(',')?;
        let padded = self.parse_string()?;
        self.expect(')')?;

        let token = padded
            .strip_prefix(' ')
            .and_then(|t| t.strip_suffix(' '))
            .filter(|t| !t.is_empty() && !t.contains(char::is_whitespace))
            .ok_or_else(|| self.error("token test needs one space-padded token"))?;
        Ok(Predicate::AttributeToken(attr, token.to_string()))
    }

    fn expect_space_literal(&mut self) -> Result<(), LocatorError> {
        if self.parse_literal()? == " " {
            Ok(())
        } else {
            Err(self.error("expected \" \""))
        }
    }

    fn parse_attr_name(&mut self) -> Result<String, LocatorError> {
        let name = self.parse_name();
        if name.is_empty() {
            Err(self.error("expected attribute name"))
        } else {
            Ok(name.to_lowercase())
        }
    }

    /// A quoted literal or `concat()` of literals.
    fn parse_string(&mut self) -> Result<String, LocatorError> {
        self.skip_ws();
        if self.eat_keyword("concat") {
            self.expect('(')?;
            let mut out = self.parse_literal()?;
            loop {
                self.skip_ws();
                if self.eat(')') {
                    return Ok(out);
                }
                self.expect(',')?;
                out.push_str(&self.parse_literal()?);
            }
        }
        self.parse_literal()
    }

    fn parse_literal(&mut self) -> Result<String, LocatorError> {
        self.skip_ws();
        let quote = match self.peek() {
            Some(q @ ('"' | '\'')) => q,
            _ => return Err(self.error("expected string literal")),
        };
        self.pos += 1;
        let start = self.pos;
        while self.peek().is_some_and(|c| c != quote) {
            self.pos += 1;
        }
        if self.peek().is_none() {
            return Err(self.error("unterminated string literal"));
        }
        let value: String = self.chars[start..self.pos].iter().collect();
        self.pos += 1;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_quoting_picks_a_free_delimiter() {
        assert_eq!(render_literal("plain"), "\"plain\"");
        assert_eq!(render_literal("say \"hi\""), "'say \"hi\"'");
        assert_eq!(
            render_literal("it's \"x\""),
            "concat(\"it's \", '\"', \"x\", '\"', \"\")"
        );
    }

    #[test]
    fn class_token_test_renders_and_parses_back() {
        let predicate = Predicate::AttributeToken("class".into(), "item".into());
        let rendered = format!("//li{}", predicate);
        assert_eq!(
            rendered,
            r#"//li[contains(concat(" ",normalize-space(@class)," ")," item ")]"#
        );
        let path = XPath::parse(&rendered).unwrap();
        assert_eq!(path.steps[0].predicates, vec![predicate]);
    }

    #[test]
    fn token_test_rejects_unpadded_or_multi_token_values() {
        for bad in [
            r#"//li[contains(concat(" ",normalize-space(@class)," "),"item")]"#,
            r#"//li[contains(concat(" ",normalize-space(@class)," ")," a b ")]"#,
            r#"//li[contains(concat("-",normalize-space(@class),"-"),"-a-")]"#,
        ] {
            assert!(XPath::parse(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn concat_literal_parses_back() {
        let value = "it's \"quoted\"";
        let expr = format!("//p[text()={}]", render_literal(value));
        let path = XPath::parse(&expr).unwrap();
        assert_eq!(
            path.steps[0].predicates,
            vec![Predicate::TextEquals(value.to_string())]
        );
    }
}
