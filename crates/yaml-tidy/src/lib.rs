//! # yaml-tidy - normalize ansible yaml in place
//!
//! ## Introduction for developers
//!
//! Read this to understand how `yaml-tidy` works internally.
//!
//! `yaml-tidy` never parses yaml. Every step is a pattern based edit of the raw text, so it keeps
//! comments, quoting and layout the way they were and only touches what a rule matches.
//!
//! ### Mapping
//!
//! see [mapping::MappingTable]
//!
//! A flat `module: prefix` file is loaded once at startup, for example
//!
//! ```text
//! copy: ansible.builtin
//! docker_container: community.docker
//! ```
//!
//! An empty or unreadable mapping aborts the run before any file is touched.
//!
//! ### Pipeline
//!
//! see [pipeline::Pipeline]
//!
//! Each document goes through three stages, in this order:
//!
//! 1. [rules::RuleSet::canonical], each rule rewriting the output of the one before it
//!    - `{{foo}}` → `{{ foo }}`
//!    - `{{ a|b }}` → `{{ a |b }}`
//!    - `#comment` → `# comment`
//!    - `- name: deploy` → `- name: Deploy`
//!    - runs of blank lines → one blank line
//! 2. [qualify::Qualifier] turns `copy:` into `ansible.builtin.copy:`
//! 3. [document::normalize] adds `---` and `...` when missing
//!
//! Running the pipeline on its own output changes nothing.
//!
//! ```
//! # use yaml_tidy::{mapping::MappingTable, pipeline::Pipeline};
//! let pipeline = Pipeline::canonical(&MappingTable::parse("copy: ansible.builtin"));
//! assert_eq!(
//!     pipeline.run("- name: copy it\n  copy:\n    src: {{src}}\n"),
//!     "---\n- name: Copy it\n  ansible.builtin.copy:\n    src: {{ src }}\n...\n",
//! );
//! ```
//!
//! ### Files
//!
//! [walk::FileFilter] selects `*.yml`/`*.yaml` below a root, minus skipped directories and file
//! names. [dispatch::Dispatcher] hands each path to [task::process_file] on a worker pool. A file
//! that fails (unreadable, not utf-8, unwritable, a rule panicking) is reported in the
//! [dispatch::Report] and does not affect any other file.
//!
pub mod dispatch;
pub mod document;
pub mod mapping;
pub mod pipeline;
pub mod qualify;
pub mod rules;
pub mod task;
pub mod walk;
