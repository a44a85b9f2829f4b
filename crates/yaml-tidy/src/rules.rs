//! ordered text rewrite rules
//!
//! A [Rule] is a pattern and a pure replacement function. Rules in a [RuleSet] run one after
//! another over the whole document, each one sees the output of the previous one. The order of
//! [RuleSet::canonical] is part of its behavior.
//!
//! Matching is purely lexical. Rules know nothing about yaml indentation or quoting and will
//! happily rewrite inside quoted strings.
use regex::{Captures, Regex};
use std::borrow::Cow;

/// Builds the replacement text from one match
pub type Replace = fn(&Captures) -> String;

#[derive(Debug, Clone)]
pub struct Rule {
    name: &'static str,
    pattern: Regex,
    replace: Replace,
}

impl Rule {
    pub fn new(name: &'static str, pattern: &str, replace: Replace) -> Result<Self, regex::Error> {
        Ok(Self {
            name,
            pattern: Regex::new(pattern)?,
            replace,
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Replace all non-overlapping matches
    pub fn apply<'t>(&self, text: &'t str) -> Cow<'t, str> {
        self.pattern
            .replace_all(text, |captures: &Captures| (self.replace)(captures))
    }
}

#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// The formatting rules, in the order they must run
    pub fn canonical() -> Self {
        let rules = CANONICAL
            .iter()
            .map(|(name, pattern, replace)| {
                Rule::new(*name, pattern, *replace)
                    .unwrap_or_else(|err| panic!("invalid canonical rule {name}: {err}"))
            })
            .collect();

        Self { rules }
    }

    #[tracing::instrument(level = "trace", skip_all)]
    pub fn apply(&self, text: &str) -> String {
        let mut text = text.to_owned();

        for rule in &self.rules {
            let rewritten = match rule.apply(&text) {
                Cow::Owned(rewritten) => rewritten,
                Cow::Borrowed(_) => continue,
            };

            tracing::trace!(rule = rule.name, "rule matched");
            text = rewritten;
        }

        text
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

const CANONICAL: &[(&str, &str, Replace)] = &[
    ("template-open", r"\{\{([\w|(])", space_after_open),
    ("template-close", r"([\w)])\}\}", space_before_close),
    ("filter-pipe", r"(\w)((?:\|\w+)+)", space_before_pipe),
    ("comment", r"#(\w)", space_after_comment),
    ("step-name", r"(- name:\s)(\w)", capitalize_step_name),
    ("blank-lines", r"\n\s*\n", collapse_blank_lines),
];

fn space_after_open(captures: &Captures) -> String {
    format!("{{{{ {}", &captures[1])
}

fn space_before_close(captures: &Captures) -> String {
    format!("{} }}}}", &captures[1])
}

/// `a|b|c` becomes `a |b |c`
///
/// Only the left side of each pipe gets a space. A whole chain is rewritten in one match, so a
/// one character operand between two pipes is not skipped.
fn space_before_pipe(captures: &Captures) -> String {
    let mut replaced = captures[1].to_owned();
    for operand in captures[2].split('|').skip(1) {
        replaced.push_str(" |");
        replaced.push_str(operand);
    }
    replaced
}

fn space_after_comment(captures: &Captures) -> String {
    format!("# {}", &captures[1])
}

fn capitalize_step_name(captures: &Captures) -> String {
    format!("{}{}", &captures[1], titlecase(&captures[2]))
}

/// Titlecase the first character: `ß` becomes `Ss`, `ǆ` becomes `ǅ`
///
/// Letters whose uppercase form is several characters keep the first one uppercase and lowercase
/// the rest. Greek letters with ypogegrammeni and `ŉ` come out lowercase after the first
/// character instead of using their precomposed titlecase form.
fn titlecase(word: &str) -> String {
    let mut chars = word.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };

    let mut titled = match first {
        '\u{01C4}'..='\u{01C6}' => '\u{01C5}'.to_string(),
        '\u{01C7}'..='\u{01C9}' => '\u{01C8}'.to_string(),
        '\u{01CA}'..='\u{01CC}' => '\u{01CB}'.to_string(),
        '\u{01F1}'..='\u{01F3}' => '\u{01F2}'.to_string(),
        _ => {
            let mut upper = first.to_uppercase();
            let mut titled: String = upper.next().into_iter().collect();
            titled.extend(upper.flat_map(char::to_lowercase));
            titled
        }
    };

    titled.push_str(chars.as_str());
    titled
}

fn collapse_blank_lines(_: &Captures) -> String {
    "\n\n".to_owned()
}
