use super::{Bound, Clause, QueryError, MATCH_ALL};

/// Parse a query string produced by [`SearchQuery`](super::SearchQuery)
/// rendering back into clauses.
///
/// Accepts `*`, or space-separated `@field:[lo hi]` and `@field:value` terms.
/// Range bounds are integers, `-inf` or `+inf`.
pub fn parse_clauses(input: &str) -> Result<Vec<Clause>, QueryError> {
    if input.trim() == MATCH_ALL {
        return Ok(Vec::new());
    }

    let mut cursor = Cursor { src: input, pos: 0 };
    let mut clauses = Vec::new();
    loop {
        cursor.skip_whitespace();
        if cursor.peek().is_none() {
            break;
        }
        clauses.push(cursor.clause()?);
    }

    if clauses.is_empty() {
        return Err(cursor.error("empty query"));
    }
    Ok(clauses)
}

struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        self.take_while(char::is_whitespace);
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if pred(c)) {
            self.bump();
        }
        &self.src[start..self.pos]
    }

    fn expect(&mut self, want: char) -> Result<(), QueryError> {
        match self.peek() {
            Some(c) if c == want => {
                self.bump();
                Ok(())
            }
            _ => Err(self.error(format!("expected '{}'", want))),
        }
    }

    fn error(&self, reason: impl Into<String>) -> QueryError {
        QueryError::Syntax {
            at: self.pos,
            reason: reason.into(),
        }
    }

    fn clause(&mut self) -> Result<Clause, QueryError> {
        self.expect('@')?;
        let field = self.take_while(|c| c.is_ascii_alphanumeric() || c == '_');
        if field.is_empty() {
            return Err(self.error("expected field name"));
        }
        self.expect(':')?;

        if self.peek() == Some('[') {
            self.bump();
            self.skip_whitespace();
            let min = parse_bound(self.take_while(is_bound_char))?;
            self.skip_whitespace();
            let max = parse_bound(self.take_while(is_bound_char))?;
            self.skip_whitespace();
            self.expect(']')?;
            Ok(Clause::range(field, min, max))
        } else {
            let value = self.take_while(|c| !c.is_whitespace());
            if value.is_empty() {
                return Err(self.error("expected tag value"));
            }
            Ok(Clause::tag(field, value))
        }
    }
}

fn is_bound_char(c: char) -> bool {
    !c.is_whitespace() && c != ']'
}

fn parse_bound(raw: &str) -> Result<Bound, QueryError> {
    match raw {
        "-inf" => Ok(Bound::NegInfinity),
        "+inf" | "inf" => Ok(Bound::PosInfinity),
        _ => raw
            .parse::<i64>()
            .map(Bound::Value)
            .map_err(|_| QueryError::Bound(raw.to_string())),
    }
}
