//! module name to collection prefix table
//!
//! [MappingTable] is loaded once per run from a line oriented file
//!
//! ```text
//! copy: ansible.builtin
//! docker_container: community.docker
//! ```
//!
//! and is read-only afterwards. Insertion order is kept; the qualifier applies
//! entries in exactly this order.
use indexmap::IndexMap;
use std::path::Path;

#[derive(Default, Debug, Clone, PartialEq, serde::Serialize)]
#[serde(transparent)]
pub struct MappingTable {
    entries: IndexMap<String, String>,
}

impl MappingTable {
    /// Parse `name: prefix` lines. Malformed lines are skipped.
    pub fn parse(text: &str) -> Self {
        let mut table = Self::default();

        for (line_number, line) in text.lines().enumerate() {
            let parts: Vec<&str> = line.trim().split(':').collect();
            let [name, prefix] = parts.as_slice() else {
                tracing::trace!(line = line_number + 1, "skipping line without a single pair");
                continue;
            };

            if let Err(reason) = table.insert(name.trim(), prefix.trim()) {
                tracing::warn!(line = line_number + 1, %reason, "skipping mapping entry");
            }
        }

        table
    }

    pub fn load_file(path: &Path) -> Result<Self, MappingError> {
        tracing::info!(path=%path.display(), "loading mapping file");

        let text = std::fs::read_to_string(path).map_err(|source| MappingError::Io {
            path: path.to_owned(),
            source,
        })?;

        let table = Self::parse(&text);
        if table.is_empty() {
            return Err(MappingError::NoEntries(path.to_owned()));
        }

        tracing::debug!(entries = table.len(), "mapping loaded");
        Ok(table)
    }

    /// Modules shipped in `ansible.builtin`
    pub fn builtin() -> Self {
        let mut table = Self::default();
        for name in BUILTIN_MODULES {
            table
                .insert(name, "ansible.builtin")
                .expect("builtin module names are valid");
        }
        table
    }

    /// Add or update an entry
    ///
    /// Names that contain a `.` are already qualified and names with whitespace can never be
    /// matched, both are rejected. Updating keeps the existing position.
    pub fn insert(&mut self, name: &str, prefix: &str) -> Result<(), InvalidEntry> {
        if name.is_empty() {
            return Err(InvalidEntry::EmptyName);
        }
        if prefix.is_empty() {
            return Err(InvalidEntry::EmptyPrefix(name.to_owned()));
        }
        if name.contains('.') {
            return Err(InvalidEntry::AlreadyQualified(name.to_owned()));
        }
        if name.contains(char::is_whitespace) || prefix.contains(char::is_whitespace) {
            return Err(InvalidEntry::Whitespace(name.to_owned()));
        }

        self.entries.insert(name.to_owned(), prefix.to_owned());
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, prefix)| (name.as_str(), prefix.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(thiserror::Error, Debug)]
pub enum MappingError {
    #[error("Unable to read mapping file {}", .path.display())]
    Io {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
    #[error("No valid mapping found in {}", .0.display())]
    NoEntries(std::path::PathBuf),
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum InvalidEntry {
    #[error("module name is empty")]
    EmptyName,
    #[error("prefix for `{0}` is empty")]
    EmptyPrefix(String),
    #[error("`{0}` is already qualified")]
    AlreadyQualified(String),
    #[error("`{0}` contains whitespace")]
    Whitespace(String),
}

const BUILTIN_MODULES: &[&str] = &[
    "add_host",
    "apt",
    "apt_key",
    "apt_repository",
    "assemble",
    "assert",
    "async_status",
    "blockinfile",
    "command",
    "copy",
    "cron",
    "deb822_repository",
    "debconf",
    "debug",
    "dnf",
    "dnf5",
    "dpkg_selections",
    "expect",
    "fail",
    "fetch",
    "file",
    "find",
    "gather_facts",
    "get_url",
    "getent",
    "git",
    "group",
    "group_by",
    "hostname",
    "import_playbook",
    "import_role",
    "import_tasks",
    "include",
    "include_role",
    "include_tasks",
    "include_vars",
    "iptables",
    "known_hosts",
    "lineinfile",
    "meta",
    "package",
    "package_facts",
    "pause",
    "ping",
    "pip",
    "raw",
    "reboot",
    "replace",
    "rpm_key",
    "script",
    "service",
    "service_facts",
    "set_fact",
    "set_stats",
    "setup",
    "shell",
    "slurp",
    "stat",
    "subversion",
    "systemd_service",
    "sysvinit",
    "tempfile",
    "template",
    "unarchive",
    "uri",
    "user",
    "validate_argument_spec",
    "wait_for",
    "wait_for_connection",
    "yum",
    "yum_repository",
];

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_trims_and_skips_malformed_lines() {
        let table = MappingTable::parse(
            "copy: ansible.builtin\n\
             \x20 docker_container :  community.docker  \n\
             this line has no pair\n\
             too: many: colons\n\
             \n\
             empty_prefix:\n\
             already.qualified: x\n",
        );

        let entries: Vec<_> = table.iter().collect();
        assert_eq!(
            entries,
            vec![
                ("copy", "ansible.builtin"),
                ("docker_container", "community.docker")
            ]
        );
    }

    #[test]
    fn duplicate_keeps_position_and_takes_last_prefix() {
        let table = MappingTable::parse("copy: a\nfile: b\ncopy: c\n");

        let entries: Vec<_> = table.iter().collect();
        assert_eq!(entries, vec![("copy", "c"), ("file", "b")]);
    }

    #[test]
    fn insert_rejects_qualified_names() {
        let mut table = MappingTable::default();
        assert_eq!(
            table.insert("ansible.builtin.copy", "x"),
            Err(InvalidEntry::AlreadyQualified("ansible.builtin.copy".into()))
        );
        assert!(table.is_empty());
    }

    #[test]
    fn builtin_table() {
        let table = MappingTable::builtin();
        assert_eq!(table.len(), BUILTIN_MODULES.len());
        assert_eq!(table.get("copy"), Some("ansible.builtin"));
        assert_eq!(table.iter().next(), Some(("add_host", "ansible.builtin")));
    }

    #[test]
    fn load_missing_file() {
        let err = MappingTable::load_file(Path::new("/definitely/not/here.txt"))
            .expect_err("must error");
        assert!(matches!(err, MappingError::Io { .. }));
    }

    #[test]
    fn load_file_without_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mapping.txt");
        std::fs::write(&path, "# nothing useful\n\n").unwrap();

        let err = MappingTable::load_file(&path).expect_err("must error");
        assert!(matches!(err, MappingError::NoEntries(_)));
    }
}
