//! Template Substituter (`spec.md` §4.G, component G).
//!
//! Scans the template byte stream for recognised placeholder tags and
//! replaces each with its generated fragment. Unrecognised `<<…>>`-style
//! tokens are left untouched.

use tracing::trace;

/// The set of generated fragments a template substitution pass needs.
/// Field names match the placeholder tags in `spec.md` §4.G.
pub struct Fragments {
    pub vulkan_main: String,
    pub funcpointers_decl_global: String,
    pub load_global_api_funcpointers: String,
    pub set_struct_api_from_global: String,
    pub set_global_api_from_struct: String,
    pub load_instance_api: String,
    pub load_device_api: String,
    pub load_safe_global_api: String,
    pub safe_global_api_docs: String,
    pub vulkan_version: String,
    pub revision: String,
    pub date: String,
}

/// Indents every non-empty line of `text` by `columns` spaces.
fn indent(text: &str, columns: usize) -> String {
    let pad = " ".repeat(columns);
    text.lines()
        .map(|line| {
            if line.is_empty() {
                line.to_string()
            } else {
                format!("{pad}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn substitute(template: &str, fragments: &Fragments) -> String {
    let mut out = String::with_capacity(template.len() * 2);
    let bytes = template.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        if let Some((tag, replacement, consumed)) = match_tag(&template[i..], fragments) {
            trace!(tag, "substituting template placeholder");
            out.push_str(&replacement);
            i += consumed;
        } else {
            // Copy one char at a time to stay on UTF-8 boundaries.
            let ch = template[i..].chars().next().unwrap();
            out.push(ch);
            i += ch.len_utf8();
        }
    }

    out
}

fn match_tag<'a>(rest: &str, fragments: &Fragments) -> Option<(&'static str, String, usize)> {
    const COMMENT_TAGS: &[(&str, fn(&Fragments) -> String)] = &[
        ("/*<<vulkan_main>>*/", |f| f.vulkan_main.clone()),
        ("/*<<vulkan_funcpointers_decl_global>>*/", |f| {
            f.funcpointers_decl_global.clone()
        }),
        ("/*<<vulkan_funcpointers_decl_global:4>>*/", |f| {
            indent(&f.funcpointers_decl_global, 4)
        }),
        ("/*<<load_global_api_funcpointers>>*/", |f| {
            f.load_global_api_funcpointers.clone()
        }),
        ("/*<<set_struct_api_from_global>>*/", |f| {
            f.set_struct_api_from_global.clone()
        }),
        ("/*<<set_global_api_from_struct>>*/", |f| {
            f.set_global_api_from_struct.clone()
        }),
        ("/*<<load_instance_api>>*/", |f| f.load_instance_api.clone()),
        ("/*<<load_device_api>>*/", |f| f.load_device_api.clone()),
        ("/*<<load_safe_global_api>>*/", |f| {
            f.load_safe_global_api.clone()
        }),
    ];
    const PLAIN_TAGS: &[(&str, fn(&Fragments) -> String)] = &[
        ("<<safe_global_api_docs>>", |f| f.safe_global_api_docs.clone()),
        ("<<vulkan_version>>", |f| f.vulkan_version.clone()),
        ("<<revision>>", |f| f.revision.clone()),
        ("<<date>>", |f| f.date.clone()),
    ];

    for (tag, render) in COMMENT_TAGS.iter().chain(PLAIN_TAGS) {
        if rest.starts_with(tag) {
            return Some((tag, render(fragments), tag.len()));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragments() -> Fragments {
        Fragments {
            vulkan_main: "MAIN".into(),
            funcpointers_decl_global: "PFN_x x;".into(),
            load_global_api_funcpointers: String::new(),
            set_struct_api_from_global: String::new(),
            set_global_api_from_struct: String::new(),
            load_instance_api: String::new(),
            load_device_api: String::new(),
            load_safe_global_api: String::new(),
            safe_global_api_docs: String::new(),
            vulkan_version: "1.3.250".into(),
            revision: "8".into(),
            date: "2026-07-28".into(),
        }
    }

    #[test]
    fn substitutes_recognised_tags() {
        let template = "before /*<<vulkan_main>>*/ after v<<vulkan_version>>.<<revision>>";
        let out = substitute(template, &fragments());
        assert_eq!(out, "before MAIN after v1.3.250.8");
    }

    #[test]
    fn leaves_unrecognised_tokens_intact() {
        let template = "<<something_unknown>>";
        let out = substitute(template, &fragments());
        assert_eq!(out, "<<something_unknown>>");
    }

    #[test]
    fn indents_funcpointer_decls_for_struct_variant() {
        let template = "/*<<vulkan_funcpointers_decl_global:4>>*/";
        let out = substitute(template, &fragments());
        assert_eq!(out, "    PFN_x x;");
    }
}
