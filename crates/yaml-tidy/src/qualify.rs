//! rewrite bare module keys to their fully qualified name
//!
//! For every `(name, prefix)` of the [MappingTable], `name:` at the start of the text or right
//! after a whitespace character becomes `prefix.name:`. The whitespace is kept as is.
//!
//! A key that is already qualified (`ansible.builtin.copy:`) is preceded by a `.` and never
//! matches. Because [MappingTable] refuses names containing a `.`, no entry can match the output
//! of another entry and a second run changes nothing.
use crate::mapping::MappingTable;
use regex::{Captures, Regex};
use std::borrow::Cow;

#[derive(Debug, Clone)]
pub struct Qualifier {
    entries: Vec<Entry>,
}

#[derive(Debug, Clone)]
struct Entry {
    pattern: Regex,
    qualified: String,
}

impl Qualifier {
    pub fn new(mapping: &MappingTable) -> Self {
        let entries = mapping
            .iter()
            .map(|(name, prefix)| Entry {
                pattern: Regex::new(&format!(r"(\A|\s){}:", regex::escape(name)))
                    .unwrap_or_else(|err| panic!("escaped module name `{name}` must compile: {err}")),
                qualified: format!("{prefix}.{name}:"),
            })
            .collect();

        Self { entries }
    }

    #[tracing::instrument(level = "trace", skip_all)]
    pub fn apply(&self, text: &str) -> String {
        let mut text = text.to_owned();

        for entry in &self.entries {
            let rewritten = match entry.apply(&text) {
                Cow::Owned(rewritten) => rewritten,
                Cow::Borrowed(_) => continue,
            };

            tracing::trace!(qualified = %entry.qualified, "module qualified");
            text = rewritten;
        }

        text
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Entry {
    fn apply<'t>(&self, text: &'t str) -> Cow<'t, str> {
        self.pattern.replace_all(text, |captures: &Captures| {
            format!("{}{}", &captures[1], self.qualified)
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    fn qualifier(mapping: &str) -> Qualifier {
        Qualifier::new(&MappingTable::parse(mapping))
    }

    #[test]
    fn qualifies_bare_module() {
        let qualifier = qualifier("copy: ansible.builtin");
        assert_eq!(qualifier.apply(" copy:\n"), " ansible.builtin.copy:\n");
    }

    #[test]
    fn already_qualified_is_untouched() {
        let qualifier = qualifier("copy: ansible.builtin");
        assert_eq!(
            qualifier.apply(" ansible.builtin.copy:\n"),
            " ansible.builtin.copy:\n"
        );
    }

    #[test]
    fn keeps_preceding_whitespace() {
        let qualifier = qualifier("shell: ansible.builtin");
        assert_eq!(
            qualifier.apply("- name: Run\n  shell:\n\tshell: echo\n"),
            "- name: Run\n  ansible.builtin.shell:\n\tansible.builtin.shell: echo\n"
        );
    }

    #[test]
    fn start_of_text() {
        let qualifier = qualifier("copy: ansible.builtin");
        assert_eq!(qualifier.apply("copy:\n"), "ansible.builtin.copy:\n");
    }

    #[test]
    fn requires_whole_key() {
        let qualifier = qualifier("copy: ansible.builtin\nname: nope.nope");
        assert_eq!(
            qualifier.apply("  my_copy: 1\n  copy_this: 2\n  copy : 3\n"),
            "  my_copy: 1\n  copy_this: 2\n  copy : 3\n"
        );
        assert_eq!(qualifier.apply("- name: x\n"), "- nope.nope.name: x\n");
    }

    #[test]
    fn overlapping_names_do_not_double_qualify() {
        let qualifier = qualifier(
            "name: ansible.builtin\n\
             hostname: ansible.builtin\n\
             builtin: community.general\n\
             ansible: somewhere.else",
        );

        let once = qualifier.apply("  hostname:\n    name: web\n");
        assert_eq!(
            once,
            "  ansible.builtin.hostname:\n    ansible.builtin.name: web\n"
        );
        assert_eq!(qualifier.apply(&once), once);
    }

    #[test]
    fn names_are_escaped() {
        let qualifier = qualifier("a+b: x.y");
        assert_eq!(qualifier.apply(" a+b:"), " x.y.a+b:");
        assert_eq!(qualifier.apply(" aab:"), " aab:");
    }

    #[test]
    fn empty_mapping() {
        let qualifier = Qualifier::new(&MappingTable::default());
        assert!(qualifier.is_empty());
        assert_eq!(qualifier.apply(" copy:"), " copy:");
    }
}
