use hostmap_core::{Settings, Translator};
use std::path::PathBuf;

pub fn print_grammar(
    settings: Settings,
    subcommand: Vec<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut translator = Translator::new(settings);
    let subcommand: Vec<&str> = subcommand.iter().map(String::as_str).collect();

    let spec = if subcommand == ["compose"] {
        translator
            .grammar()
            .compose_spec()?
            .cloned()
            .ok_or("compose is not supported by the CLI")?
    } else {
        translator.grammar().spec(&subcommand)?.clone()
    };

    println!("{}", serde_json::to_string_pretty(&spec)?);
    Ok(())
}

pub fn print_mounts(settings: Settings) -> Result<(), Box<dyn std::error::Error>> {
    let translator = Translator::new(settings);
    let mounts = translator.mounts();

    println!("Container: {}", mounts.container_id()?);
    println!("{:<8} {:<40} {}", "TYPE", "DESTINATION", "SOURCE");
    for entry in mounts.resolve()? {
        println!(
            "{:<8} {:<40} {}",
            entry.mount_type, entry.destination, entry.source
        );
    }
    Ok(())
}

pub fn print_host_paths(
    settings: Settings,
    paths: Vec<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let translator = Translator::new(settings);
    let virtualizer = translator.virtualizer()?;

    for path in paths {
        println!("{}", virtualizer.to_host_path(&path)?.display());
    }
    Ok(())
}
