//! Generator pipeline: turns a parsed [`vkreg::Registry`] plus a template
//! into a composite Vulkan header (`spec.md` §2 data flow).

pub mod emit;
pub mod error;
pub mod loader;
pub mod order;
pub mod resolver;
pub mod template;
pub mod values;
pub mod version;

use std::fmt::Write as _;
use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use vkreg::Registry;

pub use error::{Error, Result};

pub struct Paths {
    pub registry: PathBuf,
    pub template: PathBuf,
    pub output: PathBuf,
}

impl Default for Paths {
    fn default() -> Paths {
        Paths {
            registry: "resources/vk.xml".into(),
            template: "template/vkbind_template.h".into(),
            output: "vkbind.h".into(),
        }
    }
}

/// Runs the full pipeline: load, reorder, resolve, emit, substitute,
/// atomically write. Returns the final header's byte length on success.
pub fn generate(paths: &Paths) -> Result<usize> {
    let mut registry = load_registry(&paths.registry)?;

    order::reorder_promotions(&mut registry);

    let vulkan_version = version::derive_vulkan_version(&registry);
    let previous_output = fs::read_to_string(&paths.output).ok();
    let revision = vulkan_version
        .as_ref()
        .map(|v| version::derive_revision(v, previous_output.as_deref()))
        .unwrap_or(0);

    let mut emitter = emit::Emitter::new(&registry);
    let mut vulkan_main = String::new();
    for feature in &registry.features {
        let _ = writeln!(vulkan_main, "{}", emitter.emit_feature(&registry, feature));
    }
    for extension in &registry.extensions {
        let _ = writeln!(vulkan_main, "{}", emitter.emit_extension(&registry, extension));
    }

    let walk = loader::CommandWalk::new(&registry);
    let fragments = template::Fragments {
        vulkan_main,
        funcpointers_decl_global: funcpointer_decls(&registry),
        load_global_api_funcpointers: walk.emit_global_table(),
        set_struct_api_from_global: struct_assignments(&registry, true),
        set_global_api_from_struct: struct_assignments(&registry, false),
        load_instance_api: walk.emit_instance_table(),
        load_device_api: walk.emit_device_table(),
        load_safe_global_api: walk.emit_safe_global_table(),
        safe_global_api_docs: safe_global_docs(&registry),
        vulkan_version: vulkan_version
            .as_ref()
            .map(|v| v.to_string())
            .unwrap_or_else(|| "0.0.0".to_string()),
        revision: revision.to_string(),
        date: version::today(),
    };

    let template_text = read_file(&paths.template)?;
    let output_text = template::substitute(&template_text, &fragments);

    write_atomically(&paths.output, &output_text)?;
    info!(bytes = output_text.len(), "wrote generated header");
    Ok(output_text.len())
}

fn load_registry(path: &Path) -> Result<Registry> {
    debug!(path = %path.display(), "loading registry");
    let xml = read_file(path)?;
    Registry::parse(xml).map_err(Error::Parse)
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| Error::FailedToReadFile {
        path: path.display().to_string(),
        source,
    })
}

/// Atomic write (`spec.md` §7): write to a temp sibling file, then
/// rename over the destination so a failed write never corrupts an
/// existing output.
fn write_atomically(path: &Path, contents: &str) -> Result<()> {
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| Error::InvalidArgs("output path has no file name".to_string()))?;
    let tmp_path = dir.join(format!(".{file_name}.tmp"));

    let mut file = fs::File::create(&tmp_path).map_err(|source| Error::FailedToOpenFile {
        path: tmp_path.display().to_string(),
        source,
    })?;
    file.write_all(contents.as_bytes())
        .map_err(|source| Error::FailedToWriteFile {
            path: tmp_path.display().to_string(),
            source,
        })?;
    drop(file);

    fs::rename(&tmp_path, path).map_err(|source| Error::FailedToWriteFile {
        path: path.display().to_string(),
        source,
    })
}

fn funcpointer_decls(registry: &Registry) -> String {
    let walk = loader::CommandWalk::new(registry);
    let mut out = String::new();
    for name in walk.all_names() {
        let _ = writeln!(out, "PFN_{name} {name};");
    }
    out
}

fn struct_assignments(registry: &Registry, from_global: bool) -> String {
    let walk = loader::CommandWalk::new(registry);
    let mut out = String::new();
    for name in walk.all_names() {
        if from_global {
            let _ = writeln!(out, "pAPI->{name} = {name};");
        } else {
            let _ = writeln!(out, "{name} = pAPI->{name};");
        }
    }
    out
}

fn safe_global_docs(registry: &Registry) -> String {
    let mut out = String::new();
    for feature in &registry.features {
        let _ = writeln!(out, "// {}", feature.name);
        for require in &feature.requires {
            for command in &require.commands {
                let _ = writeln!(out, "//   {command}");
            }
        }
    }
    out
}
