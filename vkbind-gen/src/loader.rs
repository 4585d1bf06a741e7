//! Loader-Table Emitter (`spec.md` §4.F, component F).
//!
//! Classifies every command by dispatch tier and emits the three loader
//! tables (global/instance/device) plus the safe-global subset, grouping
//! platform-specific extensions under their `#ifdef` guard.

use std::collections::HashSet;
use std::fmt::Write as _;

use tracing::trace;
use vkreg::{Command, Extension, Registry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchLevel {
    Global,
    Instance,
    Device,
}

/// Classifies a command by its first parameter's handle type, walking
/// the handle `parent` chain. Aliased commands inherit the target's
/// classification (`spec.md` §4.F).
pub fn classify(registry: &Registry, command: &Command) -> DispatchLevel {
    let resolved = resolve_alias(registry, command);
    let Some(first_param) = resolved.parameters.first() else {
        return DispatchLevel::Global;
    };
    let first_type = first_param.decl.type_name.as_ref();

    if first_type == "VkDevice" || registry.handle_is_descendant_of(first_type, "VkDevice") {
        DispatchLevel::Device
    } else if first_type == "VkInstance" || registry.handle_is_descendant_of(first_type, "VkInstance")
    {
        DispatchLevel::Instance
    } else {
        DispatchLevel::Global
    }
}

fn resolve_alias<'a>(registry: &'a Registry, command: &'a Command) -> &'a Command {
    let mut current = command;
    let mut hops = 0;
    while let Some(alias) = &current.alias {
        match registry.find_command(alias) {
            Some(next) => current = next,
            None => break,
        }
        hops += 1;
        if hops > 64 {
            break;
        }
    }
    current
}

/// Ordered walk over every command in the registry: features ascending,
/// then non-platform extensions, then platform extensions (grouped by
/// their `protect` guard).
pub struct CommandWalk<'a> {
    registry: &'a Registry,
}

impl<'a> CommandWalk<'a> {
    pub fn new(registry: &'a Registry) -> CommandWalk<'a> {
        CommandWalk { registry }
    }

    fn all_command_names(&self) -> Vec<(&'a str, Option<&'a Extension>)> {
        let mut out = Vec::new();
        for feature in &self.registry.features {
            for require in &feature.requires {
                for name in &require.commands {
                    out.push((name.as_ref(), None));
                }
            }
        }
        let (platform_exts, non_platform_exts): (Vec<_>, Vec<_>) = self
            .registry
            .extensions
            .iter()
            .partition(|e| e.platform.is_some());
        for ext in &non_platform_exts {
            for require in &ext.requires {
                for name in &require.commands {
                    out.push((name.as_ref(), Some(ext)));
                }
            }
        }
        for ext in &platform_exts {
            for require in &ext.requires {
                for name in &require.commands {
                    out.push((name.as_ref(), Some(ext)));
                }
            }
        }
        out
    }

    fn leaked<'b>(name: &'b str, registry: &'a Registry) -> &'a str {
        registry
            .commands
            .get_key_value(name)
            .map(|(k, _)| *k)
            .unwrap_or(name)
    }

    /// Every command name reachable from features and extensions, in
    /// declared order, deduplicated. Used for header-wide fragments
    /// (funcpointer declarations, struct field assignments) that need
    /// the same ordering as the loader tables but aren't tables
    /// themselves.
    pub fn all_names(&self) -> Vec<&'a str> {
        let mut seen = HashSet::new();
        self.all_command_names()
            .into_iter()
            .map(|(name, _ext)| Self::leaked(name, self.registry))
            .filter(|name| seen.insert(name.to_string()))
            .collect()
    }

    pub fn emit_global_table(&self) -> String {
        let mut seen = HashSet::new();
        self.walk_grouped(|out, name, _ext| {
            if seen.insert(name.to_string()) {
                let _ = writeln!(out, "{name} = (PFN_{name})dlsym(vulkanSO, \"{name}\");");
            }
        })
    }

    pub fn emit_safe_global_table(&self) -> String {
        let mut seen = HashSet::new();
        self.walk_grouped(|out, name, _ext| {
            let Some(command) = self.registry.find_command(name) else {
                return;
            };
            if classify(self.registry, command) == DispatchLevel::Global
                && seen.insert(name.to_string())
            {
                let _ = writeln!(
                    out,
                    "{name} = (PFN_{name})vkGetInstanceProcAddr(NULL, \"{name}\");"
                );
            }
        })
    }

    pub fn emit_instance_table(&self) -> String {
        let mut seen = HashSet::new();
        self.walk_grouped(|out, name, _ext| {
            if name == "vkGetInstanceProcAddr" {
                return;
            }
            if seen.insert(name.to_string()) {
                let _ = writeln!(
                    out,
                    "{name} = (PFN_{name})vkGetInstanceProcAddr(instance, \"{name}\");"
                );
            }
        })
    }

    pub fn emit_device_table(&self) -> String {
        let mut seen = HashSet::new();
        self.walk_grouped(|out, name, _ext| {
            let Some(command) = self.registry.find_command(name) else {
                return;
            };
            if classify(self.registry, command) == DispatchLevel::Device
                && seen.insert(name.to_string())
            {
                let _ = writeln!(
                    out,
                    "{name} = (PFN_{name})vkGetDeviceProcAddr(device, \"{name}\");"
                );
            }
        })
    }

    /// Walks every command, wrapping platform-specific extensions'
    /// contributions in their `#ifdef <protect>` guard, and returns the
    /// assembled fragment.
    fn walk_grouped(&self, mut f: impl FnMut(&mut String, &str, Option<&Extension>)) -> String {
        let mut out = String::new();
        let mut current_protect: Option<&str> = None;
        for (name, ext) in self.all_command_names() {
            let protect = ext.and_then(|e| e.platform.as_ref()).and_then(|p| {
                self.registry
                    .platforms
                    .iter()
                    .find(|plat| &plat.name == p)
                    .map(|plat| plat.protect.as_ref())
            });

            if protect != current_protect {
                if current_protect.is_some() {
                    let _ = writeln!(out, "#endif");
                }
                if let Some(protect) = protect {
                    trace!(protect, "entering platform guard in loader table");
                    let _ = writeln!(out, "#ifdef {protect}");
                }
                current_protect = protect;
            }
            f(&mut out, Self::leaked(name, self.registry), ext);
        }
        if current_protect.is_some() {
            let _ = writeln!(out, "#endif");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vkreg::parse_registry;

    fn registry(xml: &str) -> Registry {
        parse_registry(xml.to_string()).unwrap()
    }

    fn handles_and_commands() -> &'static str {
        r#"<registry>
            <types>
                <type category="handle" name="VkInstance"><type>VK_DEFINE_HANDLE</type><name>VkInstance</name></type>
                <type category="handle" name="VkPhysicalDevice" parent="VkInstance"><type>VK_DEFINE_HANDLE</type><name>VkPhysicalDevice</name></type>
                <type category="handle" name="VkDevice" parent="VkPhysicalDevice"><type>VK_DEFINE_HANDLE</type><name>VkDevice</name></type>
                <type category="handle" name="VkCommandBuffer" parent="VkDevice"><type>VK_DEFINE_HANDLE</type><name>VkCommandBuffer</name></type>
            </types>
            <commands>
                <command>
                    <proto><type>void</type> <name>vkCmdDraw</name></proto>
                    <param><type>VkCommandBuffer</type> <name>commandBuffer</name></param>
                </command>
                <command>
                    <proto><type>VkResult</type> <name>vkCreateInstance</name></proto>
                    <param><type>void</type> <name>pCreateInfo</name></param>
                </command>
            </commands>
            <feature api="vulkan" name="VK_VERSION_1_0" number="1.0">
                <require>
                    <command name="vkCmdDraw"/>
                    <command name="vkCreateInstance"/>
                </require>
            </feature>
        </registry>"#
    }

    #[test]
    fn classifies_device_level_command_via_parent_chain() {
        // Scenario D (spec.md §8): vkCmdDraw's first param is
        // VkCommandBuffer, a transitive child of VkDevice.
        let registry = registry(handles_and_commands());
        let command = registry.find_command("vkCmdDraw").unwrap();
        assert_eq!(classify(&registry, command), DispatchLevel::Device);
    }

    #[test]
    fn device_command_appears_in_device_table() {
        let registry = registry(handles_and_commands());
        let walk = CommandWalk::new(&registry);
        let device_table = walk.emit_device_table();
        assert!(device_table.contains("vkCmdDraw"));
        assert!(!device_table.contains("vkCreateInstance"));
    }

    #[test]
    fn global_table_contains_every_command_once() {
        let registry = registry(handles_and_commands());
        let walk = CommandWalk::new(&registry);
        let table = walk.emit_global_table();
        assert_eq!(table.lines().filter(|l| l.contains("vkCmdDraw")).count(), 1);
        assert_eq!(
            table.lines().filter(|l| l.contains("vkCreateInstance")).count(),
            1
        );
    }
}
