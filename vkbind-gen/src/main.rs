use std::path::PathBuf;
use std::process::ExitCode;

use vkbind_gen::Paths;

/// Minimal CLI surface (`spec.md` §6): no positional arguments, hardcoded
/// default paths overridable via environment variables, a single
/// diagnostic line and non-zero exit on failure.
fn paths_from_env() -> Paths {
    let mut paths = Paths::default();
    if let Ok(registry) = std::env::var("VKBIND_GEN_REGISTRY") {
        paths.registry = PathBuf::from(registry);
    }
    if let Ok(template) = std::env::var("VKBIND_GEN_TEMPLATE") {
        paths.template = PathBuf::from(template);
    }
    if let Ok(output) = std::env::var("VKBIND_GEN_OUTPUT") {
        paths.output = PathBuf::from(output);
    }
    paths
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let paths = paths_from_env();
    match vkbind_gen::generate(&paths) {
        Ok(bytes) => {
            println!("wrote {} ({bytes} bytes)", paths.output.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("vkbind-gen: {err}");
            ExitCode::FAILURE
        }
    }
}
