use crate::error::TranslateError;
use hostmap_grammar::Options;
use hostmap_mount::PathVirtualizer;

/// Rewrites the host side of `-v/--volume` and `--mount type=bind` options.
pub fn convert_run_options(
    options: &mut Options,
    virtualizer: &PathVirtualizer<'_>,
) -> Result<(), TranslateError> {
    for option in options.iter_mut() {
        if option.is(&["-v", "--volume"]) {
            option.value = convert_volume(&option.value, virtualizer)?;
        } else if option.is(&["--mount"]) {
            option.value = convert_mount(&option.value, virtualizer)?;
        }
    }
    Ok(())
}

/// `SRC:DST[:OPTS]`, where SRC may also be a volume name.
fn convert_volume(spec: &str, virtualizer: &PathVirtualizer<'_>) -> Result<String, TranslateError> {
    let mut parts: Vec<&str> = spec.split(':').collect();
    if parts.len() < 2 || !is_path_source(parts[0]) {
        return Ok(spec.to_string());
    }

    let host = host_path(parts[0], virtualizer)?;
    parts[0] = &host;
    Ok(parts.join(":"))
}

/// `type=bind,source=SRC,target=DST[,...]`
fn convert_mount(spec: &str, virtualizer: &PathVirtualizer<'_>) -> Result<String, TranslateError> {
    let is_bind = spec
        .split(',')
        .any(|field| field.split_once('=') == Some(("type", "bind")));
    if !is_bind {
        return Ok(spec.to_string());
    }

    let fields = spec
        .split(',')
        .map(|field| -> Result<String, TranslateError> {
            match field.split_once('=') {
                Some((key @ ("source" | "src"), value)) => {
                    Ok(format!("{}={}", key, host_path(value, virtualizer)?))
                }
                _ => Ok(field.to_string()),
            }
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(fields.join(","))
}

fn is_path_source(source: &str) -> bool {
    source.contains('/') || source.starts_with('.')
}

fn host_path(source: &str, virtualizer: &PathVirtualizer<'_>) -> Result<String, TranslateError> {
    let host_path = virtualizer.to_host_path(source)?;
    tracing::info!(source = %source, host_path = ?host_path, "Rewriting volume source");
    Ok(host_path.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hostmap_mount::{MountEntry, MountError, MountTable};

    fn convert(args: &[(&str, &str)]) -> Result<Vec<String>, TranslateError> {
        let table = MountTable::from_entries(
            "abc",
            vec![MountEntry::bind("/home/u/app", "/workspaces/app")],
        );
        let virtualizer = PathVirtualizer::new(&table, "/workspaces/app");

        let mut options = Options::new();
        for (name, value) in args {
            options.add(*name, *value);
        }
        convert_run_options(&mut options, &virtualizer)?;
        Ok(options.to_args())
    }

    #[test]
    fn test_volume_sources() {
        let args = convert(&[
            ("-v", "./data:/data"),
            ("--volume", "/workspaces/app/conf:/conf:ro"),
            ("-v", "cache:/cache"),
            ("-v", "/anonymous"),
            ("--rm", "true"),
        ])
        .unwrap();

        assert_eq!(
            args,
            vec![
                "-v=/home/u/app/data:/data",
                "--volume=/home/u/app/conf:/conf:ro",
                "-v=cache:/cache",
                "-v=/anonymous",
                "--rm=true",
            ]
        );
    }

    #[test]
    fn test_mount_option() {
        let args = convert(&[
            ("--mount", "type=bind,src=./src,dst=/src,readonly"),
            ("--mount", "type=volume,source=./not-a-bind,target=/v"),
        ])
        .unwrap();

        assert_eq!(
            args,
            vec![
                "--mount=type=bind,src=/home/u/app/src,dst=/src,readonly",
                "--mount=type=volume,source=./not-a-bind,target=/v",
            ]
        );
    }

    #[test]
    fn test_unbacked_volume() {
        let err = convert(&[("-v", "/tmp/x:/x")]).unwrap_err();
        assert!(matches!(
            err,
            TranslateError::Mount(MountError::PathNotHostBacked(_))
        ));
    }
}
