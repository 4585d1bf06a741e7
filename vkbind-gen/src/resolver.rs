//! Dependency Resolver (`spec.md` §4.C, component C).
//!
//! For a feature or extension, computes the transitive closure of the
//! types and enum containers it requires, in an order where every
//! dependency appears before whatever depends on it.

use indexmap::IndexSet;
use tracing::{trace, warn};
use vkreg::{Command, Registry, Require, TypeCategory};

/// The resolved, forward-reference-safe dependency lists for one feature
/// or extension.
#[derive(Debug, Default)]
pub struct Closure {
    pub types: Vec<&'static str>,
    pub enum_containers: Vec<&'static str>,
}

#[derive(Default)]
struct Walk {
    visited_types: IndexSet<&'static str>,
    visited_enums: IndexSet<&'static str>,
    types: Vec<&'static str>,
    enum_containers: Vec<&'static str>,
}

/// Walks the roots named by `requires` and returns the post-order
/// transitive closure (`spec.md` §4.C).
pub fn resolve(registry: &Registry, requires: &[Require]) -> Closure {
    let mut walk = Walk::default();

    for require in requires {
        for type_name in &require.types {
            visit_type(registry, &mut walk, type_name);
        }
        for enum_ref in &require.enums {
            if let Some(extends) = &enum_ref.extends {
                visit_enum_container(registry, &mut walk, extends);
            } else {
                // A bare `#define`-style enum item names its own
                // single-item container.
                visit_enum_container(registry, &mut walk, &enum_ref.name);
            }
        }
        for command_name in &require.commands {
            visit_command(registry, &mut walk, command_name);
        }
    }

    Closure {
        types: walk.types,
        enum_containers: walk.enum_containers,
    }
}

fn visit_type(registry: &Registry, walk: &mut Walk, name: &str) {
    if walk.visited_types.contains(name) {
        return;
    }
    let Some(ty) = registry.find_type(name) else {
        warn!(name, "unresolved type dependency");
        return;
    };
    // Mark visited before recursing: breaks self-referential cycles
    // (a struct member pointing back to its own struct type).
    let key = leak_key(name, registry);
    walk.visited_types.insert(key);
    trace!(name, "visiting type");

    if let Some(alias_target) = &ty.alias {
        visit_type(registry, walk, alias_target);
        walk.types.push(key);
        return;
    }

    match ty.category {
        TypeCategory::Struct | TypeCategory::Union => {
            for member in &ty.members {
                if !member.decl.type_name.is_empty() {
                    visit_type(registry, walk, &member.decl.type_name);
                }
                if let Some(array_enum) = &member.decl.array_enum {
                    visit_enum_container(registry, walk, array_enum);
                }
            }
        }
        TypeCategory::FuncPointer => {
            if let Some(sig) = &ty.funcpointer {
                for param in &sig.params {
                    if !param.decl.type_name.is_empty() {
                        visit_type(registry, walk, &param.decl.type_name);
                    }
                    if let Some(array_enum) = &param.decl.array_enum {
                        visit_enum_container(registry, walk, array_enum);
                    }
                }
            }
        }
        _ => {
            if let Some(requires) = &ty.requires {
                visit_type(registry, walk, requires);
            }
            if let Some(bitvalues) = &ty.bitvalues {
                visit_enum_container(registry, walk, bitvalues);
            }
            if let TypeCategory::Enum = ty.category {
                // A plain `category="enum"` type shares its name with the
                // `<enums>` container holding its values (VkResult, etc).
                visit_enum_container(registry, walk, &ty.name);
            }
            if let TypeCategory::Handle = ty.category {
                if let Some(parent) = &ty.parent {
                    visit_type(registry, walk, parent);
                }
            }
        }
    }

    walk.types.push(key);
}

fn visit_enum_container(registry: &Registry, walk: &mut Walk, name: &str) {
    if walk.visited_enums.contains(name) {
        return;
    }
    let Some(_container) = registry.find_enum_container(name) else {
        warn!(name, "unresolved enum container dependency");
        return;
    };
    let key = leak_key(name, registry);
    walk.visited_enums.insert(key);
    walk.enum_containers.push(key);
}

fn visit_command(registry: &Registry, walk: &mut Walk, name: &str) {
    let Some(command) = find_command_resolving_alias(registry, name) else {
        warn!(name, "unresolved command dependency");
        return;
    };
    visit_command_types(registry, walk, command);
}

fn visit_command_types(registry: &Registry, walk: &mut Walk, command: &Command) {
    if !command.return_type_name.is_empty() {
        visit_type(registry, walk, &command.return_type_name);
    }
    for param in &command.parameters {
        if !param.decl.type_name.is_empty() {
            visit_type(registry, walk, &param.decl.type_name);
        }
    }
}

fn find_command_resolving_alias<'a>(registry: &'a Registry, name: &str) -> Option<&'a Command> {
    let mut current = registry.find_command(name)?;
    let mut hops = 0;
    while let Some(alias) = &current.alias {
        current = registry.find_command(alias)?;
        hops += 1;
        if hops > 64 {
            // Alias chains are a DAG per `spec.md` §3; this is a circuit
            // breaker against a malformed registry, not expected to fire.
            return None;
        }
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vkreg::parse_registry;

    fn registry(xml: &str) -> Registry {
        parse_registry(xml.to_string()).unwrap()
    }

    #[test]
    fn dependency_ordering_places_members_before_dependent_struct() {
        // Invariant 1 (spec.md §8): A depends on B => B's index < A's index.
        let registry = registry(
            r#"<registry>
                <types>
                    <type category="basetype" name="VkBool32"><type>uint32_t</type> <name>VkBool32</name></type>
                    <type category="struct" name="Inner">
                        <member><type>VkBool32</type> <name>flag</name></member>
                    </type>
                    <type category="struct" name="Outer">
                        <member><type>Inner</type> <name>inner</name></member>
                    </type>
                </types>
                <feature api="vulkan" name="VK_VERSION_1_0" number="1.0">
                    <require><type name="Outer"/></require>
                </feature>
            </registry>"#,
        );
        let closure = resolve(&registry, &registry.features[0].requires);
        let pos = |n: &str| closure.types.iter().position(|t| *t == n).unwrap();
        assert!(pos("VkBool32") < pos("Inner"));
        assert!(pos("Inner") < pos("Outer"));
    }

    #[test]
    fn no_duplicate_emission_for_shared_dependency() {
        // Invariant 2 (spec.md §8): a type required by two roots appears once.
        let registry = registry(
            r#"<registry>
                <types>
                    <type category="basetype" name="VkBool32"><type>uint32_t</type> <name>VkBool32</name></type>
                    <type category="struct" name="A">
                        <member><type>VkBool32</type> <name>flag</name></member>
                    </type>
                    <type category="struct" name="B">
                        <member><type>VkBool32</type> <name>flag</name></member>
                    </type>
                </types>
                <feature api="vulkan" name="VK_VERSION_1_0" number="1.0">
                    <require><type name="A"/><type name="B"/></require>
                </feature>
            </registry>"#,
        );
        let closure = resolve(&registry, &registry.features[0].requires);
        assert_eq!(closure.types.iter().filter(|t| **t == "VkBool32").count(), 1);
    }

    #[test]
    fn breaks_self_referential_struct_cycle() {
        let registry = registry(
            r#"<registry>
                <types>
                    <type category="struct" name="Node">
                        <member><type>Node</type> <name>next</name></member>
                    </type>
                </types>
                <feature api="vulkan" name="VK_VERSION_1_0" number="1.0">
                    <require><type name="Node"/></require>
                </feature>
            </registry>"#,
        );
        let closure = resolve(&registry, &registry.features[0].requires);
        assert_eq!(closure.types, vec!["Node"]);
    }

}

/// Every type/enum container name already lives for `'static` (the
/// registry source is leaked once at parse time), so `IndexMap` keys and
/// the closures we build from them can both hold `&'static str` without
/// re-allocating.
fn leak_key(name: &str, registry: &Registry) -> &'static str {
    registry
        .find_type(name)
        .map(|_| ())
        .or_else(|| registry.find_enum_container(name).map(|_| ()))
        .and_then(|_| {
            registry
                .types
                .get_key_value(name)
                .map(|(k, _)| *k)
                .or_else(|| registry.enum_containers.get_key_value(name).map(|(k, _)| *k))
        })
        .unwrap_or_else(|| Box::leak(name.to_string().into_boxed_str()))
}
