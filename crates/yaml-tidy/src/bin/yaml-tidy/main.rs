mod cli;

use anyhow::Context;
use std::path::Path;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use yaml_tidy::dispatch::{Dispatcher, Report};
use yaml_tidy::mapping::MappingTable;
use yaml_tidy::pipeline::Pipeline;
use yaml_tidy::rules::RuleSet;
use yaml_tidy::task::WriteMode;
use yaml_tidy::walk::FileFilter;

/// Exit status when at least one file could not be processed
const SOME_FILES_FAILED: u8 = 2;

const LOG_ENV: &str = "YAML_TIDY_LOG";

/// Used when `YAML_TIDY_LOG` is unset, for stderr and `--log-file` alike
const DEFAULT_LOG_DIRECTIVE: &str = "info";

fn main() -> ExitCode {
    use clap::Parser;
    let cli = cli::Cli::parse();

    if let Err(e) = init_logging(cli.log_file.as_deref()) {
        for error in e.chain() {
            eprintln!("{error}")
        }
        return ExitCode::FAILURE;
    }

    let command_result = match cli.command {
        cli::Command::Format(format_cli) => format(format_cli),
        cli::Command::Dev(dev_cli) => dev(dev_cli).map(|()| ExitCode::SUCCESS),
    };

    match command_result {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "run aborted");
            for error in e.chain() {
                eprintln!("{error}")
            }
            ExitCode::FAILURE
        }
    }
}

fn init_logging(log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_DIRECTIVE));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);

    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;

            subscriber
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .init();
        }
        None => subscriber.with_writer(std::io::stderr).init(),
    }

    Ok(())
}

pub fn format(cli: cli::FormatCommand) -> anyhow::Result<ExitCode> {
    let mapping = load_mapping(&cli.mapping)?;
    let pipeline = Pipeline::canonical(&mapping);

    let filter = FileFilter::new(cli.skip_dirs, cli.skip_list, cli.skip_dir_match.into());
    let files = filter
        .collect(&cli.path)
        .context("Failed to collect yaml files")?;

    let mode = if cli.dry_run {
        WriteMode::DryRun
    } else {
        WriteMode::InPlace
    };

    let report = Dispatcher::new(cli.jobs, mode).run(&files, &pipeline)?;
    tracing::info!(
        processed = report.processed,
        changed = report.changed.len(),
        failed = report.failures.len(),
        "run finished"
    );

    output(&cli.output, &report)?;

    if report.has_failures() {
        return Ok(ExitCode::from(SOME_FILES_FAILED));
    }
    Ok(ExitCode::SUCCESS)
}

fn load_mapping(args: &cli::MappingArgs) -> anyhow::Result<MappingTable> {
    if args.builtin {
        return Ok(MappingTable::builtin());
    }

    let Some(path) = &args.file else {
        anyhow::bail!("No mapping given, use --mapping-file or --builtin-mapping");
    };

    Ok(MappingTable::load_file(path)?)
}

fn output(output: &cli::OutputArgs, report: &Report) -> anyhow::Result<()> {
    match output.format {
        cli::OutputFormat::Text => print!("{report}"),
        cli::OutputFormat::Json => {
            serde_json::to_writer_pretty(std::io::stdout(), report)?;
            println!();
        }
        cli::OutputFormat::Yaml => serde_yaml::to_writer(std::io::stdout(), report)?,
    };

    Ok(())
}

/// (yaml-tidy-)developer utilities
///
/// A quick way to expose internal structures for debugging purposes
pub fn dev(cli: cli::DevCommand) -> anyhow::Result<()> {
    use cli::DevSubCommand::*;

    match cli.command {
        Rules => {
            let pipeline = Pipeline::canonical(&MappingTable::default());
            write_rules(&mut std::io::stdout(), pipeline.rules())?;
        }
        Mapping(args) => {
            let mapping = load_mapping(&args)?;
            serde_yaml::to_writer(std::io::stdout(), &mapping)?;
        }
    }

    Ok(())
}

fn write_rules(out: &mut impl std::io::Write, rules: &RuleSet) -> std::io::Result<()> {
    for (index, rule) in rules.iter().enumerate() {
        writeln!(out, "{}. {:<16} {}", index + 1, rule.name(), rule.pattern())?;
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use std::sync::{Arc, Mutex};
    use yaml_tidy::task::{process_file, WriteMode};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn default_filter_logs_every_processed_file() {
        let dir = tempfile::tempdir().unwrap();
        let files: Vec<_> = ["site.yml", "tidy.yml"]
            .iter()
            .map(|name| dir.path().join(name))
            .collect();
        std::fs::write(&files[0], "- name: copy it\n  copy:\n").unwrap();
        std::fs::write(&files[1], "---\na: 1\n...\n").unwrap();

        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new(DEFAULT_LOG_DIRECTIVE))
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let pipeline = Pipeline::canonical(&MappingTable::builtin());
        tracing::subscriber::with_default(subscriber, || {
            for file in &files {
                process_file(file, &pipeline, WriteMode::InPlace);
            }
        });

        let log = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        let lines: Vec<_> = log
            .lines()
            .filter(|line| line.contains("processed file"))
            .collect();
        assert_eq!(lines.len(), 2, "{log}");
        assert!(lines.iter().all(|line| line.contains("INFO")), "{log}");
        assert!(lines[0].contains(&files[0].display().to_string()), "{log}");
        assert!(lines[0].contains("change=Changed"), "{log}");
        assert!(lines[1].contains("change=Unchanged"), "{log}");
    }

    #[test]
    fn rule_listing() {
        let mut out = vec![];
        write_rules(&mut out, &RuleSet::canonical()).unwrap();

        insta::assert_snapshot!(String::from_utf8(out).unwrap(), @r###"
        1. template-open    \{\{([\w|(])
        2. template-close   ([\w)])\}\}
        3. filter-pipe      (\w)((?:\|\w+)+)
        4. comment          #(\w)
        5. step-name        (- name:\s)(\w)
        6. blank-lines      \n\s*\n
        "###);
    }

    #[test]
    fn mapping_listing() {
        let mapping = MappingTable::parse("copy: ansible.builtin\ndocker_container: community.docker");

        assert_eq!(
            serde_yaml::to_string(&mapping).unwrap(),
            "copy: ansible.builtin\ndocker_container: community.docker\n"
        );
    }
}
