//! Trackable declarations (`spec.md` §3, redesign note in §9: the
//! heterogeneous option bag becomes two distinct record types with the
//! launcher deciding which loop to run off the discriminator built into
//! which list a trackable was appended to).

use crate::parser::{Parser, ParserArgs};
use regex::Regex;
use std::sync::Arc;

/// Selects which top-level keys of a parsed full-file record are delivered
/// (`spec.md` §4.5). A literal matches a key by equality; a pattern matches
/// by full-string match (not `find`, which would also accept a substring).
#[derive(Clone)]
pub enum ValueSelector {
    Literal(String),
    Pattern(Arc<Regex>),
}

impl ValueSelector {
    pub fn literal(name: impl Into<String>) -> Self {
        Self::Literal(name.into())
    }

    pub fn pattern(re: Regex) -> Self {
        Self::Pattern(Arc::new(re))
    }

    pub fn matches(&self, key: &str) -> bool {
        match self {
            Self::Literal(s) => s == key,
            Self::Pattern(re) => is_full_match(re, key),
        }
    }
}

impl From<&str> for ValueSelector {
    fn from(s: &str) -> Self {
        Self::literal(s)
    }
}

impl From<String> for ValueSelector {
    fn from(s: String) -> Self {
        Self::Literal(s)
    }
}

impl From<Regex> for ValueSelector {
    fn from(re: Regex) -> Self {
        Self::pattern(re)
    }
}

fn is_full_match(re: &Regex, s: &str) -> bool {
    matches!(re.find(s), Some(m) if m.start() == 0 && m.end() == s.len())
}

/// A full-file trackable: files meaningful only when read whole.
#[derive(Clone)]
pub struct FullFileTrackable {
    pub glob: String,
    pub selectors: Vec<ValueSelector>,
    pub parser: Option<Parser>,
    pub parser_args: ParserArgs,
    /// The file is written once; after one successful read the worker exits.
    pub static_file: bool,
    /// Explicit file-type tag overriding suffix-based dispatch.
    pub file_type: Option<String>,
}

impl FullFileTrackable {
    pub fn new(glob: impl Into<String>) -> Self {
        Self {
            glob: glob.into(),
            selectors: Vec::new(),
            parser: None,
            parser_args: ParserArgs::new(),
            static_file: false,
            file_type: None,
        }
    }

    #[must_use]
    pub fn select(mut self, selectors: impl IntoIterator<Item = ValueSelector>) -> Self {
        self.selectors.extend(selectors);
        self
    }

    #[must_use]
    pub fn parser(mut self, parser: Parser) -> Self {
        self.parser = Some(parser);
        self
    }

    #[must_use]
    pub fn parser_args(mut self, args: ParserArgs) -> Self {
        self.parser_args = args;
        self
    }

    #[must_use]
    pub fn static_file(mut self, is_static: bool) -> Self {
        self.static_file = is_static;
        self
    }

    #[must_use]
    pub fn file_type(mut self, file_type: impl Into<String>) -> Self {
        self.file_type = Some(file_type.into());
        self
    }
}

/// One tracked value for a tail trackable: an optional override label plus
/// the regular expression matched against each candidate line.
#[derive(Clone)]
pub struct TailValueSelector {
    pub label: Option<String>,
    pub pattern: Regex,
}

impl TailValueSelector {
    pub fn new(pattern: Regex) -> Self {
        Self {
            label: None,
            pattern,
        }
    }

    #[must_use]
    pub fn labeled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// A tail trackable: files that grow by append, read incrementally.
#[derive(Clone)]
pub struct TailTrackable {
    pub glob: String,
    pub selectors: Vec<TailValueSelector>,
    pub parser: Option<Parser>,
    pub parser_args: ParserArgs,
    pub skip_patterns: Vec<Regex>,
    /// If false, captured values are always delivered as text even when
    /// they parse as numeric literals (`spec.md` §4.5).
    pub convert_numeric: bool,
}

impl TailTrackable {
    pub fn new(glob: impl Into<String>) -> Self {
        Self {
            glob: glob.into(),
            selectors: Vec::new(),
            parser: None,
            parser_args: ParserArgs::new(),
            skip_patterns: Vec::new(),
            convert_numeric: true,
        }
    }

    #[must_use]
    pub fn select(mut self, selectors: impl IntoIterator<Item = TailValueSelector>) -> Self {
        self.selectors.extend(selectors);
        self
    }

    #[must_use]
    pub fn parser(mut self, parser: Parser) -> Self {
        self.parser = Some(parser);
        self
    }

    #[must_use]
    pub fn parser_args(mut self, args: ParserArgs) -> Self {
        self.parser_args = args;
        self
    }

    #[must_use]
    pub fn skip(mut self, patterns: impl IntoIterator<Item = Regex>) -> Self {
        self.skip_patterns.extend(patterns);
        self
    }

    #[must_use]
    pub fn convert_numeric(mut self, convert: bool) -> Self {
        self.convert_numeric = convert;
        self
    }
}

#[cfg(test)]
#[path = "trackable_tests.rs"]
mod tests;
