use crate::error::TranslateError;
use crate::temp_files::TempFiles;
use hostmap_compose::{Cleanup, ComposeRewriter, default_files};
use hostmap_grammar::Options;
use hostmap_mount::PathVirtualizer;
use std::path::{Path, PathBuf};

/// Replaces the compose files named by `options` with rewritten copies.
///
/// When no file needed rewriting the options are returned unchanged with an
/// empty [`Cleanup`]. Otherwise `--file` and `--project-directory` are
/// appended after the remaining options, one `--file` per input file.
///
/// Rewritten files are registered in `temp_files` as they are created and
/// handed back in the returned [`Cleanup`]. If `temp_files` is cancelled
/// midway, no further file is written and the call fails.
pub fn convert_compose_options(
    options: Options,
    virtualizer: &PathVirtualizer<'_>,
    temp_dir: Option<PathBuf>,
    temp_files: &TempFiles,
) -> Result<(Options, Cleanup), TranslateError> {
    let working_dir = virtualizer.base_dir().to_path_buf();

    let mut files = Vec::new();
    let mut project_dir = None;
    let mut rest = Options::new();

    for option in &options {
        if option.is(&["-f", "--file"]) {
            files.push(PathBuf::from(&option.value));
        } else if option.is(&["--project-directory"]) {
            project_dir = Some(PathBuf::from(&option.value));
        } else {
            rest.add(option.name.clone(), option.value.clone());
        }
    }

    let project_dir = project_dir.unwrap_or_else(|| {
        files
            .first()
            .and_then(|file| file.parent())
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    });

    if files.is_empty() {
        files = default_files(&working_dir);
    }

    let rewriter = ComposeRewriter::new(virtualizer, temp_dir);
    let converted = files
        .iter()
        .map(|file| -> Result<String, TranslateError> {
            let path = working_dir.join(file);
            match rewriter.load(&path, &project_dir)? {
                Some(document) => {
                    let temp = temp_files.track(|| rewriter.store(&path, &document))?;
                    Ok(temp.display().to_string())
                }
                None => Ok(file.display().to_string()),
            }
        })
        .collect::<Result<Vec<_>, _>>();

    let cleanup = temp_files.take();
    let file_args = match converted {
        Ok(file_args) => file_args,
        Err(e) => {
            cleanup.release();
            return Err(e);
        }
    };

    if cleanup.is_empty() {
        return Ok((options, cleanup));
    }

    for file in file_args {
        rest.add("--file", file);
    }
    rest.add("--project-directory", project_dir.display().to_string());

    Ok((rest, cleanup))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hostmap_mount::{MountEntry, MountTable};
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        project: TempDir,
        temp: TempDir,
        table: MountTable,
    }

    impl Fixture {
        fn new() -> Self {
            let project = TempDir::new().unwrap();
            let destination = project.path().display().to_string();
            let table = MountTable::from_entries(
                "abc",
                vec![MountEntry::bind("/home/u/app", &destination)],
            );
            Self {
                project,
                temp: TempDir::new().unwrap(),
                table,
            }
        }

        fn write(&self, name: &str, text: &str) {
            fs::write(self.project.path().join(name), text).unwrap();
        }

        fn convert(&self, args: &[(&str, &str)]) -> Result<(Options, Cleanup), TranslateError> {
            let virtualizer = PathVirtualizer::new(&self.table, self.project.path());
            let options = args.iter().map(|(n, v)| hostmap_grammar::ParsedOption::new(*n, *v)).collect();
            convert_compose_options(
                options,
                &virtualizer,
                Some(self.temp.path().to_path_buf()),
                &TempFiles::new(),
            )
        }
    }

    const COMPOSE: &str = "services:\n  web:\n    volumes:\n      - ./html:/html\n";

    #[test]
    fn test_explicit_file() {
        let fixture = Fixture::new();
        fixture.write("docker-compose.yml", COMPOSE);

        let (options, cleanup) = fixture
            .convert(&[("-p", "demo"), ("-f", "docker-compose.yml")])
            .unwrap();
        assert_eq!(cleanup.len(), 1);

        let args = options.to_args();
        let temp_file = cleanup.paths().next().unwrap().to_path_buf();
        assert_eq!(
            args,
            vec![
                "-p=demo".to_string(),
                format!("--file={}", temp_file.display()),
                "--project-directory=.".to_string(),
            ]
        );

        let rewritten = fs::read_to_string(&temp_file).unwrap();
        assert!(rewritten.contains("/home/u/app/html:/html"));

        cleanup.release();
        assert!(!temp_file.exists());
    }

    #[test]
    fn test_default_file_and_override() {
        let fixture = Fixture::new();
        fixture.write("compose.yaml", COMPOSE);
        fixture.write("compose.override.yaml", "not: [yaml");

        let (options, cleanup) = fixture.convert(&[]).unwrap();
        assert_eq!(cleanup.len(), 1);

        let args = options.to_args();
        assert_eq!(args.len(), 3);
        assert!(args[0].starts_with(&format!("--file={}", fixture.temp.path().display())));
        assert_eq!(
            args[1],
            format!("--file={}", fixture.project.path().join("compose.override.yaml").display())
        );
        assert_eq!(args[2], "--project-directory=.");
    }

    #[test]
    fn test_project_directory_option() {
        let fixture = Fixture::new();
        fs::create_dir(fixture.project.path().join("deploy")).unwrap();
        fixture.write("deploy/compose.yml", COMPOSE);

        let (options, cleanup) = fixture
            .convert(&[("--file", "deploy/compose.yml")])
            .unwrap();
        let rewritten = fs::read_to_string(cleanup.paths().next().unwrap()).unwrap();
        assert!(rewritten.contains("/home/u/app/deploy/html:/html"));
        assert_eq!(options.to_args().last().unwrap(), "--project-directory=deploy");

        let (_, cleanup) = fixture
            .convert(&[("--file", "deploy/compose.yml"), ("--project-directory", ".")])
            .unwrap();
        let rewritten = fs::read_to_string(cleanup.paths().next().unwrap()).unwrap();
        assert!(rewritten.contains("/home/u/app/html:/html"));
    }

    #[test]
    fn test_nothing_to_rewrite() {
        let fixture = Fixture::new();
        fixture.write("docker-compose.yml", "version: '3'\n");

        let (options, cleanup) = fixture.convert(&[("-f", "docker-compose.yml")]).unwrap();
        assert!(cleanup.is_empty());
        assert_eq!(options.to_args(), vec!["-f=docker-compose.yml"]);
    }

    #[test]
    fn test_second_file_failure_discards_first() {
        let fixture = Fixture::new();
        fixture.write("a.yml", COMPOSE);
        fixture.write("b.yml", "services:\n  db:\n    volumes:\n      - /opt/x:/x\n");

        let result = fixture.convert(&[("-f", "a.yml"), ("-f", "b.yml")]);
        assert!(result.is_err());
        assert_eq!(fs::read_dir(fixture.temp.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_cancelled_conversion_writes_nothing() {
        let fixture = Fixture::new();
        fixture.write("docker-compose.yml", COMPOSE);

        let temp_files = TempFiles::new();
        assert!(temp_files.cancel());

        let virtualizer = PathVirtualizer::new(&fixture.table, fixture.project.path());
        let options = std::iter::once(hostmap_grammar::ParsedOption::new("-f", "docker-compose.yml")).collect();
        let err = convert_compose_options(
            options,
            &virtualizer,
            Some(fixture.temp.path().to_path_buf()),
            &temp_files,
        )
        .unwrap_err();

        assert!(matches!(err, TranslateError::Cancelled));
        assert_eq!(fs::read_dir(fixture.temp.path()).unwrap().count(), 0);
    }
}
