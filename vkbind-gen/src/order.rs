//! Ordering & Reorderer (`spec.md` §4.D, component D).
//!
//! The deprecation-chain adjustment runs during parsing (`vkreg::parse`);
//! this module applies the second pass (promotion adjustment) and fixes
//! the in-category emission order within one dependency closure.

use tracing::debug;
use vkreg::{Registry, Type, TypeCategory};

/// Moves each extension with a non-empty `promotedto` to immediately
/// after the extension it names. Idempotent: re-running on an
/// already-ordered list is a no-op.
pub fn reorder_promotions(registry: &mut Registry) {
    let mut i = 0;
    while i < registry.extensions.len() {
        let Some(target) = registry.extensions[i].promotedto.clone() else {
            i += 1;
            continue;
        };
        // `promotedto` may point at a feature name (e.g. "VK_VERSION_1_1")
        // rather than another extension; only extension targets reorder.
        let Some(target_pos) = registry
            .extensions
            .iter()
            .position(|e| e.name == target)
        else {
            i += 1;
            continue;
        };

        if target_pos + 1 == i || target_pos == i {
            i += 1;
            continue;
        }

        debug!(
            extension = %registry.extensions[i].name,
            promoted_to = %target,
            "reordering extension after its promotion target"
        );
        let moved = registry.extensions.remove(i);
        let insert_at = if target_pos > i { target_pos } else { target_pos + 1 };
        registry.extensions.insert(insert_at, moved);
        // Don't advance `i`: the element now at `i` hasn't been checked yet.
    }
}

/// One category bucket in the fixed emission order (`spec.md` §4.D).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Include,
    Define,
    BaseType,
    Handle,
    BitmaskOrEnum,
    StructUnionOrFuncPointer,
}

pub fn category_of(ty: &Type) -> Category {
    match ty.category {
        TypeCategory::Include => Category::Include,
        TypeCategory::Define => Category::Define,
        TypeCategory::BaseType => Category::BaseType,
        TypeCategory::Handle => Category::Handle,
        TypeCategory::Bitmask | TypeCategory::Enum => Category::BitmaskOrEnum,
        TypeCategory::Struct | TypeCategory::Union | TypeCategory::FuncPointer => {
            Category::StructUnionOrFuncPointer
        }
        TypeCategory::Plain => Category::BaseType,
    }
}

/// Stable-sorts a resolver closure's type names into the fixed
/// in-category order while preserving each category's internal
/// dependency order (a stable sort on resolver output order suffices,
/// since the resolver already emits dependencies before dependents).
pub fn sort_types_by_category(registry: &Registry, mut names: Vec<&'static str>) -> Vec<&'static str> {
    names.sort_by_key(|name| {
        registry
            .find_type(name)
            .map(category_of)
            .unwrap_or(Category::BaseType) as u8
    });
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use vkreg::parse_registry;

    fn registry(xml: &str) -> Registry {
        parse_registry(xml.to_string()).unwrap()
    }

    #[test]
    fn promotion_moves_extension_after_its_target() {
        // Scenario E (spec.md §8): extension B with promotedto="A" ends
        // up positioned immediately after A, even when the registry lists
        // B before A.
        let mut registry = registry(
            r#"<registry>
                <extensions>
                    <extension name="B" number="2" supported="vulkan" promotedto="A"/>
                    <extension name="A" number="1" supported="vulkan"/>
                    <extension name="C" number="3" supported="vulkan"/>
                </extensions>
            </registry>"#,
        );
        reorder_promotions(&mut registry);
        let names: Vec<&str> = registry.extensions.iter().map(|e| e.name.as_ref()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn already_ordered_promotion_is_a_no_op() {
        let mut registry = registry(
            r#"<registry>
                <extensions>
                    <extension name="A" number="1" supported="vulkan"/>
                    <extension name="B" number="2" supported="vulkan" promotedto="A"/>
                    <extension name="C" number="3" supported="vulkan"/>
                </extensions>
            </registry>"#,
        );
        reorder_promotions(&mut registry);
        let names: Vec<&str> = registry.extensions.iter().map(|e| e.name.as_ref()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn promotion_to_a_feature_version_is_left_in_place() {
        // `promotedto` may name a core feature instead of another
        // extension; those have no reorder target and stay put.
        let mut registry = registry(
            r#"<registry>
                <extensions>
                    <extension name="A" number="1" supported="vulkan" promotedto="VK_VERSION_1_1"/>
                    <extension name="B" number="2" supported="vulkan"/>
                </extensions>
            </registry>"#,
        );
        reorder_promotions(&mut registry);
        let names: Vec<&str> = registry.extensions.iter().map(|e| e.name.as_ref()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn category_order_is_basetype_then_struct() {
        let registry = registry(
            r#"<registry>
                <types>
                    <type category="basetype" name="VkBool32"><type>uint32_t</type> <name>VkBool32</name></type>
                    <type category="struct" name="VkExtent2D">
                        <member><type>VkBool32</type> <name>flag</name></member>
                    </type>
                </types>
            </registry>"#,
        );
        let sorted = sort_types_by_category(&registry, vec!["VkExtent2D", "VkBool32"]);
        assert_eq!(sorted, vec!["VkBool32", "VkExtent2D"]);
    }
}
