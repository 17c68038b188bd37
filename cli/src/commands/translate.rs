use hostmap_core::{Settings, Translator};
use std::time::Duration;

const TIMEOUT_EXIT_CODE: i32 = 124;

pub async fn translate(
    settings: Settings,
    args: Vec<String>,
    keep: bool,
    timeout: Option<Duration>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut translator = Translator::new(settings);
    let temp_files = translator.temp_files();
    let mut task = tokio::task::spawn_blocking(move || translator.translate(args));

    let joined = match timeout {
        Some(limit) => match tokio::time::timeout(limit, &mut task).await {
            Ok(joined) => joined,
            Err(_) if temp_files.cancel() => {
                eprintln!("Translation timed out after {}s", limit.as_secs());
                std::process::exit(TIMEOUT_EXIT_CODE);
            }
            // files were already handed over, the result is moments away
            Err(_) => task.await,
        },
        None => task.await,
    };
    let command = joined.map_err(|e| format!("Translation task failed: {}", e))??;

    for arg in command.args() {
        println!("{}", arg);
    }

    if keep {
        let (_, cleanup) = command.into_parts();
        if let Some(cleanup) = cleanup {
            for path in cleanup.keep()? {
                eprintln!("Kept {}", path.display());
            }
        }
    } else {
        command.finish();
    }

    Ok(())
}
