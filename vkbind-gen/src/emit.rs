//! Emitter (`spec.md` §4.E, component E).
//!
//! Renders one textual fragment per feature/extension, tracking global
//! emitted-sets so a symbol already declared by an earlier feature is
//! never re-declared by a later one.

use std::collections::HashSet;
use std::fmt::Write as _;

use indexmap::IndexMap;
use tracing::{debug, trace};
use vkreg::{
    Command, EnumContainer, EnumContainerKind, EnumItem, Extension, Feature, Registry, Require,
    RequireEnum, Type, TypeCategory,
};

use crate::order::{category_of, sort_types_by_category, Category};
use crate::resolver::{self, Closure};
use crate::values::{bitpos_hex32, bitpos_hex64_vc6_safe, extension_enum_value, max_enum_token};

/// Tracks symbols already written, scoped to a single generator run
/// (`spec.md` §5: the only mutable state shared across the emitter).
#[derive(Default)]
pub struct Emitter {
    emitted_defines: HashSet<String>,
    emitted_types: HashSet<String>,
    /// Separate from `emitted_types`: a plain `category="enum"` type and
    /// its `<enums>` container share one name, so a no-op pass over the
    /// `Type` (in `emit_type`) must not block the container's own
    /// emission later in `emit_enum_containers`.
    emitted_enum_containers: HashSet<String>,
    emitted_commands: HashSet<String>,
    /// `Require.enums[]` entries with `extends` set, bucketed by the
    /// container they extend, in the order their owning feature/extension
    /// appears. Built once up front so a container's full item list is
    /// known the first time it needs to be emitted.
    enum_extensions: IndexMap<String, Vec<PendingEnumItem>>,
    vendor_tags: Vec<String>,
}

struct PendingEnumItem {
    req: RequireEnum,
    owner_is_extension: bool,
    owner_extnumber: u32,
}

impl Emitter {
    pub fn new(registry: &Registry) -> Emitter {
        let mut emitter = Emitter {
            vendor_tags: registry.tags.iter().map(|t| t.name.to_string()).collect(),
            ..Default::default()
        };
        emitter.collect_enum_extensions(registry);
        emitter
    }

    fn collect_enum_extensions(&mut self, registry: &Registry) {
        for feature in &registry.features {
            for require in &feature.requires {
                self.collect_from_require(require, false, 0);
            }
        }
        for extension in &registry.extensions {
            for require in &extension.requires {
                self.collect_from_require(require, true, extension.number);
            }
        }
    }

    fn collect_from_require(&mut self, require: &Require, is_extension: bool, extnumber: u32) {
        for enum_ref in &require.enums {
            let Some(extends) = &enum_ref.extends else {
                continue;
            };
            self.enum_extensions
                .entry(extends.to_string())
                .or_default()
                .push(PendingEnumItem {
                    req: enum_ref.clone(),
                    owner_is_extension: is_extension,
                    owner_extnumber: extnumber,
                });
        }
    }

    fn tag_refs(&self) -> Vec<&str> {
        self.vendor_tags.iter().map(|s| s.as_str()).collect()
    }

    /// Renders the fragment for one feature (`spec.md` §4.E layout).
    pub fn emit_feature(&mut self, registry: &Registry, feature: &Feature) -> String {
        debug!(feature = %feature.name, "emitting feature");
        let mut out = String::new();
        let _ = writeln!(out, "#define {} 1", feature.name);
        self.emit_requires_body(registry, &mut out, &feature.requires);
        out
    }

    /// Renders the fragment for one extension, skipped entries included.
    pub fn emit_extension(&mut self, registry: &Registry, extension: &Extension) -> String {
        debug!(extension = %extension.name, "emitting extension");
        let mut out = String::new();
        let _ = writeln!(out, "#define {} 1", extension.name);
        if let Some(protect) = extension_protect(registry, extension) {
            let _ = writeln!(out, "#ifdef {protect}");
            self.emit_requires_body(registry, &mut out, &extension.requires);
            let _ = writeln!(out, "#endif /* {protect} */");
        } else {
            self.emit_requires_body(registry, &mut out, &extension.requires);
        }
        out
    }

    fn emit_requires_body(&mut self, registry: &Registry, out: &mut String, requires: &[Require]) {
        let closure = resolver::resolve(registry, requires);

        // Step 3: plain #define-style enum extensions (value set, not extending via bitpos).
        for require in requires {
            for enum_ref in &require.enums {
                if enum_ref.extends.is_none() && enum_ref.value.is_some() {
                    self.emit_define_enum(out, enum_ref);
                }
            }
        }

        self.emit_types(registry, out, &closure);
        self.emit_enum_containers(registry, out, &closure);

        for require in requires {
            for command_name in &require.commands {
                self.emit_command(registry, out, command_name);
            }
        }
    }

    fn emit_define_enum(&mut self, out: &mut String, enum_ref: &RequireEnum) {
        if !self.emitted_defines.insert(enum_ref.name.to_string()) {
            return;
        }
        if let Some(value) = &enum_ref.value {
            let _ = writeln!(out, "#define {} {}", enum_ref.name, value);
        }
    }

    fn emit_types(&mut self, registry: &Registry, out: &mut String, closure: &Closure) {
        let ordered = sort_types_by_category(registry, closure.types.clone());
        let mut last_category: Option<Category> = None;
        for name in ordered {
            if self.emitted_types.contains(name) {
                continue;
            }
            let Some(ty) = registry.find_type(name) else {
                continue;
            };
            let category = category_of(ty);
            if last_category != Some(category) {
                trace!(?category, "entering category block");
                last_category = Some(category);
            }
            self.emit_type(registry, out, ty);
        }
    }

    fn emit_type(&mut self, registry: &Registry, out: &mut String, ty: &Type) {
        if !self.emitted_types.insert(ty.name.to_string()) {
            return;
        }

        if let Some(alias_target) = &ty.alias {
            match ty.category {
                // Commands and funcpointers re-emit a full declaration
                // because the aliased target may sit behind a platform
                // guard (`spec.md` §4.E, "Aliased type emission").
                TypeCategory::FuncPointer => {
                    if let Some(target) = registry.find_type(alias_target) {
                        self.emit_funcpointer(out, &ty.name, target);
                    }
                }
                _ => {
                    let _ = writeln!(out, "typedef {} {};", alias_target, ty.name);
                }
            }
            return;
        }

        match ty.category {
            TypeCategory::Include => {
                if ty.name != "vk_platform" {
                    let _ = writeln!(out, "#include <{}.h>", ty.name);
                }
            }
            TypeCategory::Define => {
                if let Some(verbatim) = &ty.verbatim {
                    let _ = writeln!(out, "{}", verbatim);
                }
            }
            TypeCategory::BaseType => {
                if let Some(verbatim) = &ty.verbatim {
                    let _ = writeln!(out, "typedef {};", verbatim.trim_end_matches(';'));
                } else {
                    let _ = writeln!(out, "typedef struct {0} {0};", ty.name);
                }
            }
            TypeCategory::Handle => {
                let handle_macro = ty.handle_type.as_deref().unwrap_or("VK_DEFINE_HANDLE");
                let _ = writeln!(out, "{}({})", handle_macro, ty.name);
            }
            TypeCategory::Bitmask => {
                let base = ty.ty_base_name().unwrap_or("VkFlags");
                let _ = writeln!(out, "typedef {} {};", base, ty.name);
            }
            TypeCategory::Enum => {
                // Emitted together with its container in `emit_enum_containers`.
            }
            TypeCategory::Struct => self.emit_aggregate(registry, out, ty, "struct"),
            TypeCategory::Union => self.emit_aggregate(registry, out, ty, "union"),
            TypeCategory::FuncPointer => {
                if let Some(sig) = &ty.funcpointer {
                    let params = format_params(sig.params.iter().map(|m| &m.decl));
                    let _ = writeln!(
                        out,
                        "typedef {} (VKAPI_PTR *{})({});",
                        sig.return_type_ctext, ty.name, params
                    );
                }
            }
            TypeCategory::Plain => {}
        }
    }

    fn emit_funcpointer(&self, out: &mut String, name: &str, target: &Type) {
        if let Some(sig) = &target.funcpointer {
            let params = format_params(sig.params.iter().map(|m| &m.decl));
            let _ = writeln!(
                out,
                "typedef {} (VKAPI_PTR *{})({});",
                sig.return_type_ctext, name, params
            );
        }
    }

    fn emit_aggregate(&self, _registry: &Registry, out: &mut String, ty: &Type, kind: &str) {
        let _ = writeln!(out, "typedef {} {} {{", kind, ty.name);
        for member in &ty.members {
            let array = member
                .decl
                .array_enum
                .as_ref()
                .map(|e| format!("[{}]", e))
                .unwrap_or_default();
            let _ = writeln!(out, "    {} {}{};", member.decl.type_ctext, member.decl.name, array);
        }
        let _ = writeln!(out, "}} {};", ty.name);
    }

    fn emit_enum_containers(&mut self, registry: &Registry, out: &mut String, closure: &Closure) {
        for name in &closure.enum_containers {
            if !self.emitted_enum_containers.insert(name.to_string()) {
                continue;
            }
            let Some(container) = registry.find_enum_container(name) else {
                continue;
            };
            if container.kind == EnumContainerKind::Define {
                // Single-item #define containers were already handled via
                // `emit_define_enum` when their owning Require ran.
                continue;
            }
            self.emit_enum_container(registry, out, container);
        }
    }

    fn emit_enum_container(&mut self, registry: &Registry, out: &mut String, container: &EnumContainer) {
        let is_64bit = self.container_is_64bit(registry, container);
        let mut seen = HashSet::new();
        let mut all_items: Vec<&EnumItem> = Vec::new();
        for item in &container.items {
            if seen.insert(item.name.to_string()) {
                all_items.push(item);
            }
        }

        // Extension-contributed items, four phases (spec.md §4.E):
        // feature-added non-aliased, extension-added non-aliased, then
        // aliased-last (features then extensions). Base items already
        // collected above.
        let pending = self.enum_extensions.get(container.name.as_ref());
        let mut synth: Vec<EnumItem> = Vec::new();
        if let Some(pending) = pending {
            for phase in [Phase::FeatureValue, Phase::ExtensionValue, Phase::Alias] {
                for p in pending {
                    let matches_phase = match phase {
                        Phase::FeatureValue => !p.owner_is_extension && p.req.alias.is_none(),
                        Phase::ExtensionValue => p.owner_is_extension && p.req.alias.is_none(),
                        Phase::Alias => p.req.alias.is_some(),
                    };
                    if !matches_phase || !seen.insert(p.req.name.to_string()) {
                        continue;
                    }
                    synth.push(requireenum_to_item(&p.req, p.owner_extnumber));
                }
            }
        }
        for item in &synth {
            all_items.push(item);
        }

        if is_64bit {
            self.emit_64bit_flags(out, container, &all_items);
        } else {
            self.emit_32bit_enum(out, container, &all_items);
        }
    }

    fn container_is_64bit(&self, registry: &Registry, container: &EnumContainer) -> bool {
        registry
            .types
            .values()
            .find(|t| t.bitvalues.as_deref() == Some(container.name.as_ref()) || t.name == container.name)
            .map(|t| {
                t.ty_base_name()
                    .map(|b| b == "VkFlags64" || b == "uint64_t")
                    .unwrap_or(false)
            })
            .unwrap_or(false)
    }

    fn emit_32bit_enum(&self, out: &mut String, container: &EnumContainer, items: &[&EnumItem]) {
        let _ = writeln!(out, "typedef enum {{");
        for item in items {
            self.emit_32bit_item(out, container, items, item);
        }
        let max_enum = max_enum_token(&container.name, &self.tag_refs());
        let _ = writeln!(out, "    {} = 0x7FFFFFFF", max_enum);
        let _ = writeln!(out, "}} {};", container.name);
    }

    fn emit_32bit_item(&self, out: &mut String, _container: &EnumContainer, items: &[&EnumItem], item: &EnumItem) {
        if let Some(alias) = &item.alias {
            let _ = writeln!(out, "    {} = {},", item.name, alias);
            return;
        }
        if let Some(value) = &item.value {
            let _ = writeln!(out, "    {} = {},", item.name, value);
            return;
        }
        if let Some(bitpos) = item.bitpos {
            let _ = writeln!(out, "    {} = {},", item.name, bitpos_hex32(bitpos));
            return;
        }
        let _ = items; // nothing to emit; malformed per spec.md §3
    }

    fn emit_64bit_flags(&self, out: &mut String, container: &EnumContainer, items: &[&EnumItem]) {
        let _ = writeln!(out, "typedef VkFlags64 {};", container.name);
        for item in items {
            let resolved = resolve_64bit_value(container, items, item);
            let _ = writeln!(
                out,
                "static const {} {} = {};",
                container.name, item.name, resolved
            );
        }
    }

    fn emit_command(&mut self, registry: &Registry, out: &mut String, name: &str) {
        if !self.emitted_commands.insert(name.to_string()) {
            return;
        }
        let Some(command) = registry.find_command(name) else {
            return;
        };
        if let Some(alias) = &command.alias {
            if let Some(target) = registry.find_command(alias) {
                self.emit_command_pfn(out, name, target);
            }
            return;
        }
        self.emit_command_pfn(out, name, command);
    }

    fn emit_command_pfn(&self, out: &mut String, name: &str, command: &Command) {
        let params = format_params(command.parameters.iter().map(|m| &m.decl));
        let _ = writeln!(
            out,
            "typedef {} (VKAPI_PTR *PFN_{})({});",
            command.return_type_ctext, name, params
        );
    }
}

#[derive(Clone, Copy)]
enum Phase {
    FeatureValue,
    ExtensionValue,
    Alias,
}

fn requireenum_to_item(req: &RequireEnum, default_extnumber: u32) -> EnumItem {
    if req.alias.is_some() {
        return EnumItem {
            name: req.name.clone(),
            alias: req.alias.clone(),
            value: None,
            bitpos: None,
        };
    }
    if req.value.is_some() {
        return EnumItem {
            name: req.name.clone(),
            alias: None,
            value: req.value.clone(),
            bitpos: None,
        };
    }
    if let Some(bitpos) = req.bitpos {
        return EnumItem {
            name: req.name.clone(),
            alias: None,
            value: None,
            bitpos: Some(bitpos),
        };
    }
    // offset-based extension value; bake the computed literal into `value`.
    let extnumber = req.extnumber.unwrap_or(default_extnumber);
    let offset = req.offset.unwrap_or(0);
    let value = extension_enum_value(extnumber, offset, req.dir_negative);
    EnumItem {
        name: req.name.clone(),
        alias: None,
        value: Some(value.to_string().into()),
        bitpos: None,
    }
}

fn resolve_64bit_value(container: &EnumContainer, items: &[&EnumItem], item: &EnumItem) -> String {
    // Alias chains in 64-bit flags must resolve to a concrete value
    // (`spec.md` §9): walk `alias` until a `value`/`bitpos` is found.
    let mut current = item;
    let mut hops = 0;
    while let Some(alias_name) = &current.alias {
        let Some(next) = items.iter().find(|i| &i.name == alias_name).copied() else {
            break;
        };
        current = next;
        hops += 1;
        if hops > 64 {
            break;
        }
    }
    if let Some(value) = &current.value {
        return value.to_string();
    }
    if let Some(bitpos) = current.bitpos {
        return bitpos_hex64_vc6_safe(&container.name, bitpos);
    }
    "0".to_string()
}

fn format_params<'a>(params: impl Iterator<Item = &'a vkreg::TypeNamePair>) -> String {
    let parts: Vec<String> = params
        .map(|p| {
            let array = p
                .array_enum
                .as_ref()
                .map(|e| format!("[{}]", e))
                .unwrap_or_default();
            format!("{} {}{}", p.type_ctext, p.name, array)
        })
        .collect();
    if parts.is_empty() {
        "void".to_string()
    } else {
        parts.join(", ")
    }
}

fn extension_protect(registry: &Registry, extension: &Extension) -> Option<String> {
    let platform_name = extension.platform.as_ref()?;
    registry
        .platforms
        .iter()
        .find(|p| &p.name == platform_name)
        .map(|p| p.protect.to_string())
}

impl Type {
    /// Best-effort base integer type name for a `bitmask`, used to decide
    /// 32- vs 64-bit flag emission.
    fn ty_base_name(&self) -> Option<&str> {
        self.verbatim
            .as_deref()
            .map(|v| v.trim())
            .or(self.requires.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vkreg::parse_registry;

    fn registry(xml: &str) -> Registry {
        parse_registry(xml.to_string()).unwrap()
    }

    #[test]
    fn emits_struct_once_for_scenario_a() {
        let registry = registry(
            r#"<registry>
                <types>
                    <type category="struct" name="S">
                        <member><type>uint32_t</type> <name>x</name></member>
                    </type>
                </types>
                <feature api="vulkan" name="VK_VERSION_1_0" number="1.0">
                    <require><type name="S"/></require>
                </feature>
            </registry>"#,
        );
        let mut emitter = Emitter::new(&registry);
        let fragment = emitter.emit_feature(&registry, &registry.features[0]);
        assert_eq!(fragment.matches("typedef struct S {").count(), 1);
        assert!(fragment.contains("#define VK_VERSION_1_0 1"));
        assert!(fragment.contains("uint32_t x;"));
    }

    #[test]
    fn does_not_reemit_type_across_features() {
        let registry = registry(
            r#"<registry>
                <types>
                    <type category="basetype" name="VkBool32"><type>uint32_t</type> <name>VkBool32</name></type>
                </types>
                <feature api="vulkan" name="VK_VERSION_1_0" number="1.0">
                    <require><type name="VkBool32"/></require>
                </feature>
                <feature api="vulkan" name="VK_VERSION_1_1" number="1.1">
                    <require><type name="VkBool32"/></require>
                </feature>
            </registry>"#,
        );
        let mut emitter = Emitter::new(&registry);
        let first = emitter.emit_feature(&registry, &registry.features[0]);
        let second = emitter.emit_feature(&registry, &registry.features[1]);
        assert!(first.contains("VkBool32"));
        assert!(!second.contains("VkBool32"));
    }

    #[test]
    fn emits_plain_enum_container_as_anonymous_typedef() {
        let registry = registry(
            r#"<registry>
                <types>
                    <type category="enum" name="VkResult"/>
                </types>
                <enums name="VkResult" type="enum">
                    <enum value="0" name="VK_SUCCESS"/>
                    <enum value="-1" name="VK_ERROR_UNKNOWN"/>
                </enums>
                <feature api="vulkan" name="VK_VERSION_1_0" number="1.0">
                    <require><type name="VkResult"/></require>
                </feature>
            </registry>"#,
        );
        let mut emitter = Emitter::new(&registry);
        let fragment = emitter.emit_feature(&registry, &registry.features[0]);
        assert!(fragment.contains("typedef enum {"));
        assert!(!fragment.contains("typedef enum VkResult"));
        assert!(fragment.contains("VK_SUCCESS = 0,"));
        assert!(fragment.contains("} VkResult;"));
    }
}
