//! Registry Parser (`spec.md` §4.B, component B).
//!
//! Turns a `roxmltree` DOM rooted at `<registry>` into a [`crate::model::Registry`].
//! Mixed-content type/name pairs are handled by walking child nodes in
//! document order and accumulating text until a `<name>` child switches
//! accumulation from `type_ctext` to `name_ctext`, exactly as described in
//! `spec.md` §4.B.

use crate::error::ParseError;
use crate::model::*;
use roxmltree::{Document, NodeType, StringStorage};
use std::borrow::Cow;
use tracing::{debug, trace, warn};

/// A node whose input lifetime has been erased to `'static` because the
/// source XML is leaked for the lifetime of the process (registries are
/// parsed once per run).
type Node<'a> = roxmltree::Node<'a, 'static>;

trait UnwrapBorrowedOrLeak {
    fn leak(self) -> XmlStr;
}

impl UnwrapBorrowedOrLeak for Cow<'static, str> {
    fn leak(self) -> XmlStr {
        self
    }
}

fn make_xml_str(storage: &StringStorage<'static>) -> XmlStr {
    match storage {
        StringStorage::Borrowed(s) => Cow::Borrowed(*s),
        StringStorage::Owned(s) => Cow::Owned((**s).into()),
    }
}

fn attribute(node: Node, name: &str) -> Option<XmlStr> {
    node.attribute_node(name)
        .map(|attr| make_xml_str(attr.value_storage()))
}

fn require_attribute(node: Node, doc: &Document, name: &str) -> Result<XmlStr, ParseError> {
    attribute(node, name).ok_or_else(|| {
        ParseError::at(node, doc, format!("missing required attribute `{name}`"))
    })
}

fn attribute_comma_separated(node: Node, name: &str) -> Vec<XmlStr> {
    attribute(node, name)
        .map(|value| {
            value
                .split(',')
                .map(|s| Cow::Owned(s.to_string()))
                .collect()
        })
        .unwrap_or_default()
}

fn child_text(node: Node, name: &str) -> Option<XmlStr> {
    node.children()
        .find(|n| n.has_tag_name(name))
        .and_then(|n| n.text_storage().map(make_xml_str))
}

/// Returns `true` when the node's `api` attribute matches `expected`, or
/// the attribute is absent (meaning the node applies to every API).
fn api_matches(node: &Node, expected: &str) -> bool {
    node.attribute("api")
        .map(|values| values.split(',').any(|v| v == expected))
        .unwrap_or(true)
}

/// Walks a single bare-element child (`<type>`, `<name>`, `<enum>`) and
/// returns its text content.
fn element_text(node: Node, doc: &Document) -> Result<XmlStr, ParseError> {
    node.text_storage()
        .map(make_xml_str)
        .ok_or_else(|| ParseError::at(node, doc, "expected text content"))
}

/// Accumulates a mixed-content type/name pair (`spec.md` §4.B).
fn parse_type_name_pair(node: Node, doc: &Document) -> Result<TypeNamePair, ParseError> {
    let mut type_ctext = String::new();
    let mut name_ctext = String::new();
    let mut type_name: Option<XmlStr> = None;
    let mut name: Option<XmlStr> = None;
    let mut array_enum: Option<XmlStr> = None;
    let mut seen_name = false;

    for child in node.children() {
        match child.node_type() {
            NodeType::Text => {
                let Some(storage) = child.text_storage() else { continue };
                let text = make_xml_str(storage);
                if seen_name {
                    name_ctext.push_str(&text);
                } else {
                    type_ctext.push_str(&text);
                }
            }
            NodeType::Element => match child.tag_name().name() {
                "type" => {
                    let text = element_text(child, doc)?;
                    type_ctext.push_str(&text);
                    type_name = Some(text);
                }
                "name" => {
                    let text = element_text(child, doc)?;
                    name_ctext.push_str(&text);
                    name = Some(text);
                    seen_name = true;
                }
                "enum" => {
                    let text = element_text(child, doc)?;
                    name_ctext.push_str(&text);
                    array_enum = Some(text);
                }
                "comment" => break,
                other => {
                    warn!(tag = other, "unexpected element in mixed-content pair");
                }
            },
            _ => {}
        }
    }

    Ok(TypeNamePair {
        type_name: type_name
            .ok_or_else(|| ParseError::at(node, doc, "missing <type> in declaration"))?,
        type_ctext: Cow::Owned(type_ctext.trim().to_string()),
        name: name.ok_or_else(|| ParseError::at(node, doc, "missing <name> in declaration"))?,
        name_ctext: Cow::Owned(name_ctext.trim().to_string()),
        array_enum,
    })
}

fn parse_member(node: Node, doc: &Document) -> Result<Member, ParseError> {
    Ok(Member {
        decl: parse_type_name_pair(node, doc)?,
        values: attribute(node, "values"),
        len: attribute_comma_separated(node, "len"),
        altlen: attribute_comma_separated(node, "altlen"),
        optional: attribute_comma_separated(node, "optional"),
    })
}

/// Flattens a function-pointer typedef's parameter list, which the
/// registry spreads across multiple sibling nodes, to a single string with
/// `<type>X</type>` fences re-inserted around `<type>` children, then
/// extracts each parameter's bare type and trailing identifier
/// (`spec.md` §4.B).
fn parse_funcpointer(node: Node, doc: &Document) -> Result<(XmlStr, FuncPointerSig), ParseError> {
    let mut children = node.children().filter(|c| c.node_type() != NodeType::Comment);

    let first = children
        .next()
        .ok_or_else(|| ParseError::at(node, doc, "empty funcpointer declaration"))?;
    let first_text = first
        .text_storage()
        .map(make_xml_str)
        .ok_or_else(|| ParseError::at(node, doc, "funcpointer missing return-type prefix"))?;
    // `first_text` looks like "typedef <ret> (VKAPI_PTR *".
    let return_type_ctext = first_text
        .strip_prefix("typedef ")
        .and_then(|s| s.split(" (VKAPI_PTR *").next())
        .unwrap_or(first_text.trim())
        .trim()
        .to_string();

    let second = children
        .next()
        .ok_or_else(|| ParseError::at(node, doc, "funcpointer missing <name>"))?;
    let name = element_text(second, doc)?;

    let mut param_string = String::new();
    for child in children {
        match child.node_type() {
            NodeType::Text => {
                if let Some(s) = child.text_storage() {
                    param_string.push_str(&make_xml_str(s));
                }
            }
            NodeType::Element => {
                let tag = child.tag_name().name();
                let text = element_text(child, doc)?;
                param_string.push('<');
                param_string.push_str(tag);
                param_string.push('>');
                param_string.push_str(&text);
                param_string.push_str("</");
                param_string.push_str(tag);
                param_string.push('>');
            }
            _ => {}
        }
    }

    let cleaned = param_string.replace(")(", "").replace(");", "");
    let mut params = Vec::new();
    for raw_param in split_top_level_commas(&cleaned) {
        let raw_param = raw_param.trim();
        if raw_param.is_empty() || raw_param == "void" {
            continue;
        }

        let last_space = raw_param
            .rfind(' ')
            .ok_or_else(|| ParseError::at(node, doc, "malformed funcpointer parameter"))?;
        let (type_part, name_part) = raw_param.split_at(last_space);
        let name_part = name_part.trim();

        let type_ctext = type_part.replace("<type>", "").replace("</type>", "");
        let type_name = type_part
            .find("<type>")
            .and_then(|start| type_part.find("</type>").map(|end| (start, end)))
            .map(|(start, end)| type_part[start + "<type>".len()..end].to_string())
            .unwrap_or_default();

        params.push(Member {
            decl: TypeNamePair {
                type_name: Cow::Owned(type_name),
                type_ctext: Cow::Owned(type_ctext.trim().to_string()),
                name: Cow::Owned(name_part.to_string()),
                name_ctext: Cow::Owned(name_part.to_string()),
                array_enum: None,
            },
            values: None,
            len: Vec::new(),
            altlen: Vec::new(),
            optional: Vec::new(),
        });
    }

    Ok((
        name,
        FuncPointerSig {
            return_type_ctext: Cow::Owned(return_type_ctext),
            params,
        },
    ))
}

/// Splits on commas that are not nested inside parentheses. Vulkan
/// funcpointer parameter lists don't nest parens after the `)(`/`);`
/// fences are stripped, but this stays defensive against the day one does.
fn split_top_level_commas(s: &str) -> Vec<&str> {
    let mut depth = 0i32;
    let mut start = 0usize;
    let mut out = Vec::new();
    for (i, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            ',' if depth <= 0 => {
                out.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    let tail = &s[start..];
    if !tail.trim().is_empty() {
        out.push(tail);
    }
    out
}

fn parse_type(node: Node, doc: &Document) -> Result<Type, ParseError> {
    let name = attribute(node, "name")
        .or_else(|| child_text(node, "name"))
        .ok_or_else(|| ParseError::at(node, doc, "type has no name"))?;
    let category = TypeCategory::parse(node.attribute("category"));
    let alias = attribute(node, "alias");

    let mut ty = Type {
        name,
        category,
        alias,
        requires: attribute(node, "requires"),
        bitvalues: attribute(node, "bitvalues"),
        parent: attribute(node, "parent"),
        members: Vec::new(),
        funcpointer: None,
        verbatim: None,
        handle_type: None,
    };

    if ty.alias.is_some() {
        return Ok(ty);
    }

    match ty.category {
        TypeCategory::Struct | TypeCategory::Union => {
            for member_node in node.children().filter(|c| c.has_tag_name("member")) {
                ty.members.push(parse_member(member_node, doc)?);
            }
        }
        TypeCategory::FuncPointer => {
            let (name, sig) = parse_funcpointer(node, doc)?;
            ty.name = name;
            ty.funcpointer = Some(sig);
        }
        TypeCategory::Define | TypeCategory::BaseType => {
            ty.verbatim = Some(flatten_text(node));
            if let Some(text) = child_text(node, "name") {
                ty.name = text;
            }
        }
        TypeCategory::Handle => {
            ty.handle_type = child_text(node, "type");
            if let Some(text) = child_text(node, "name") {
                ty.name = text;
            }
        }
        _ => {}
    }

    Ok(ty)
}

/// Concatenates every text/element child's text, used for `define`s and
/// `basetype`s whose registry encoding is free-form C source.
fn flatten_text(node: Node) -> XmlStr {
    let mut out = String::new();
    for child in node.children() {
        match child.node_type() {
            NodeType::Text => {
                if let Some(s) = child.text_storage() {
                    out.push_str(&make_xml_str(s));
                }
            }
            NodeType::Element if child.tag_name().name() != "comment" => {
                if let Some(s) = child.text_storage() {
                    out.push_str(&make_xml_str(s));
                }
            }
            _ => {}
        }
    }
    Cow::Owned(out.trim().to_string())
}

fn parse_enum_item(node: Node, doc: &Document) -> Result<EnumItem, ParseError> {
    let bitpos = match attribute(node, "bitpos") {
        Some(s) => Some(
            s.parse::<u8>()
                .map_err(|e| ParseError::at(node, doc, format!("invalid bitpos: {e}")))?,
        ),
        None => None,
    };
    Ok(EnumItem {
        name: require_attribute(node, doc, "name")?,
        alias: attribute(node, "alias"),
        value: attribute(node, "value"),
        bitpos,
    })
}

fn parse_enums_block(node: Node, doc: &Document) -> Result<Option<EnumContainer>, ParseError> {
    let name = attribute(node, "name");
    let kind = match node.attribute("type") {
        Some("enum") => EnumContainerKind::Enum,
        Some("bitmask") => EnumContainerKind::Bitmask,
        None if name.as_deref() == Some("API Constants") => EnumContainerKind::Define,
        _ => return Ok(None),
    };

    let container_name = name.ok_or_else(|| ParseError::at(node, doc, "enums block has no name"))?;

    match kind {
        EnumContainerKind::Define => {
            // Each child becomes its own single-item container.
            // Callers merge these into the registry individually; we
            // signal that by returning None here and letting the caller
            // iterate children directly. See `parse_registry`.
            Ok(None)
        }
        _ => {
            let mut items = Vec::new();
            for item_node in node
                .children()
                .filter(|n| n.has_tag_name("enum"))
                .filter(|n| api_matches(n, "vulkan"))
            {
                items.push(parse_enum_item(item_node, doc)?);
            }
            Ok(Some(EnumContainer {
                name: container_name,
                kind,
                items,
            }))
        }
    }
}

fn parse_command(node: Node, doc: &Document) -> Result<Command, ParseError> {
    if let Some(alias) = attribute(node, "alias") {
        let name = require_attribute(node, doc, "name")?;
        return Ok(Command {
            name,
            alias: Some(alias),
            return_type_name: Cow::Borrowed(""),
            return_type_ctext: Cow::Borrowed(""),
            parameters: Vec::new(),
            successcodes: Vec::new(),
            errorcodes: Vec::new(),
        });
    }

    let proto = node
        .children()
        .find(|c| c.has_tag_name("proto"))
        .ok_or_else(|| ParseError::at(node, doc, "command missing <proto>"))?;
    let proto_decl = parse_type_name_pair(proto, doc)?;

    let mut parameters = Vec::new();
    for param_node in node
        .children()
        .filter(|c| c.has_tag_name("param"))
        .filter(|n| api_matches(n, "vulkan"))
    {
        parameters.push(parse_member(param_node, doc)?);
    }

    Ok(Command {
        name: proto_decl.name,
        alias: None,
        return_type_name: proto_decl.type_name,
        return_type_ctext: proto_decl.type_ctext,
        parameters,
        successcodes: attribute_comma_separated(node, "successcodes"),
        errorcodes: attribute_comma_separated(node, "errorcodes"),
    })
}

fn parse_require_enum(node: Node, doc: &Document) -> Result<RequireEnum, ParseError> {
    let bitpos = match attribute(node, "bitpos") {
        Some(s) => Some(
            s.parse::<u8>()
                .map_err(|e| ParseError::at(node, doc, format!("invalid bitpos: {e}")))?,
        ),
        None => None,
    };
    let offset = match attribute(node, "offset") {
        Some(s) => Some(
            s.parse::<u32>()
                .map_err(|e| ParseError::at(node, doc, format!("invalid offset: {e}")))?,
        ),
        None => None,
    };
    let extnumber = match attribute(node, "extnumber") {
        Some(s) => Some(
            s.parse::<u32>()
                .map_err(|e| ParseError::at(node, doc, format!("invalid extnumber: {e}")))?,
        ),
        None => None,
    };

    Ok(RequireEnum {
        name: require_attribute(node, doc, "name")?,
        extends: attribute(node, "extends"),
        bitpos,
        value: attribute(node, "value"),
        extnumber,
        offset,
        dir_negative: attribute(node, "dir").as_deref() == Some("-"),
        alias: attribute(node, "alias"),
    })
}

fn parse_require(node: Node, doc: &Document) -> Result<Require, ParseError> {
    let mut require = Require {
        comment: attribute(node, "comment"),
        ..Default::default()
    };

    for child in node
        .children()
        .filter(|n| n.node_type() == NodeType::Element)
        .filter(|n| api_matches(n, "vulkan"))
    {
        match child.tag_name().name() {
            "type" => require.types.push(require_attribute(child, doc, "name")?),
            "enum" => require.enums.push(parse_require_enum(child, doc)?),
            "command" => require
                .commands
                .push(require_attribute(child, doc, "name")?),
            _ => {}
        }
    }

    Ok(require)
}

fn parse_feature(node: Node, doc: &Document) -> Result<Feature, ParseError> {
    let requires = node
        .children()
        .filter(|c| c.has_tag_name("require"))
        .filter(|n| api_matches(n, "vulkan"))
        .map(|c| parse_require(c, doc))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Feature {
        api: require_attribute(node, doc, "api")?,
        name: require_attribute(node, doc, "name")?,
        number: require_attribute(node, doc, "number")?,
        requires,
    })
}

fn parse_extension(node: Node, doc: &Document) -> Result<Extension, ParseError> {
    let requires = node
        .children()
        .filter(|c| c.has_tag_name("require"))
        .filter(|n| api_matches(n, "vulkan"))
        .map(|c| parse_require(c, doc))
        .collect::<Result<Vec<_>, _>>()?;

    let number = attribute(node, "number")
        .map(|s| {
            s.parse::<u32>()
                .map_err(|e| ParseError::at(node, doc, format!("invalid extension number: {e}")))
        })
        .transpose()?
        .unwrap_or(0);

    Ok(Extension {
        name: require_attribute(node, doc, "name")?,
        number,
        ty: attribute(node, "type"),
        platform: attribute(node, "platform"),
        supported: attribute(node, "supported").unwrap_or(Cow::Borrowed("vulkan")),
        promotedto: attribute(node, "promotedto"),
        deprecatedby: attribute(node, "deprecatedby"),
        requires,
    })
}

/// Parses a `<registry>` document into a [`Registry`].
///
/// The input is leaked for the duration of the process so the model can
/// borrow directly from it without lifetime gymnastics — acceptable for a
/// one-shot code generator (`spec.md` §5: single-threaded, run-to-completion).
pub fn parse_registry(xml: String) -> Result<Registry, ParseError> {
    let xml: &'static str = Box::leak(xml.into_boxed_str());
    let doc = Document::parse(xml).map_err(|e| ParseError {
        line: 0,
        path: "<registry>".to_string(),
        message: e.to_string(),
    })?;

    let mut registry = Registry::default();
    let root = doc.root_element();

    for section in root.children().filter(|n| api_matches(n, "vulkan")) {
        match section.tag_name().name() {
            "platforms" => {
                for p in section.children().filter(|n| n.has_tag_name("platform")) {
                    let name = require_attribute(p, &doc, "name")?;
                    if name == "mir" {
                        continue;
                    }
                    registry.platforms.push(Platform {
                        name,
                        protect: require_attribute(p, &doc, "protect")?,
                    });
                }
            }
            "tags" => {
                for t in section.children().filter(|n| n.has_tag_name("tag")) {
                    registry.tags.push(Tag {
                        name: require_attribute(t, &doc, "name")?,
                        author: attribute(t, "author").unwrap_or(Cow::Borrowed("")),
                        contact: attribute(t, "contact").unwrap_or(Cow::Borrowed("")),
                    });
                }
            }
            "types" => {
                for type_node in section
                    .children()
                    .filter(|n| n.has_tag_name("type"))
                    .filter(|n| api_matches(n, "vulkan"))
                {
                    trace!(tag = "type", "parsing type node");
                    let ty = parse_type(type_node, &doc)?;
                    let key: &'static str = ty.name.clone().leak_str();
                    registry.types.insert(key, ty);
                }
            }
            "enums" => {
                let name = section.attribute("name");
                if name == Some("API Constants") {
                    for item_node in section
                        .children()
                        .filter(|n| n.has_tag_name("enum"))
                        .filter(|n| api_matches(n, "vulkan"))
                    {
                        let item = parse_enum_item(item_node, &doc)?;
                        let container = EnumContainer {
                            name: item.name.clone(),
                            kind: EnumContainerKind::Define,
                            items: vec![item],
                        };
                        let key: &'static str = container.name.clone().leak_str();
                        registry.enum_containers.insert(key, container);
                    }
                } else if let Some(container) = parse_enums_block(section, &doc)? {
                    let key: &'static str = container.name.clone().leak_str();
                    registry.enum_containers.insert(key, container);
                }
            }
            "commands" => {
                for command_node in section
                    .children()
                    .filter(|n| n.has_tag_name("command"))
                    .filter(|n| api_matches(n, "vulkan"))
                {
                    let cmd = parse_command(command_node, &doc)?;
                    let key: &'static str = cmd.name.clone().leak_str();
                    registry.commands.insert(key, cmd);
                }
            }
            "feature" => {
                debug!("parsing feature");
                registry.features.push(parse_feature(section, &doc)?);
            }
            "extensions" => {
                for ext_node in section.children().filter(|n| n.has_tag_name("extension")) {
                    let ext = parse_extension(ext_node, &doc)?;
                    if ext.is_skipped() {
                        continue;
                    }
                    registry.extensions.push(ext);
                    adjust_for_deprecation(&mut registry.extensions);
                }
            }
            _ => {}
        }
    }

    if let Some(ty) = registry.types.get("VK_HEADER_VERSION") {
        registry.header_version = ty.verbatim.clone();
    }

    Ok(registry)
}

/// Deprecation-chain adjustment (`spec.md` §4.B / §4.D pass 1): the
/// extension just appended is checked against every earlier extension; an
/// earlier extension that names the new one in `deprecatedby` is moved to
/// the end, after its deprecator.
fn adjust_for_deprecation(extensions: &mut Vec<Extension>) {
    let Some(new_name) = extensions.last().map(|e| e.name.clone()) else {
        return;
    };
    if let Some(idx) = extensions[..extensions.len() - 1]
        .iter()
        .position(|e| e.deprecatedby.as_deref() == Some(&new_name))
    {
        let moved = extensions.remove(idx);
        extensions.push(moved);
    }
}

trait LeakStr {
    fn leak_str(self) -> &'static str;
}

impl LeakStr for XmlStr {
    fn leak_str(self) -> &'static str {
        match self {
            Cow::Borrowed(s) => s,
            Cow::Owned(s) => Box::leak(s.into_boxed_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(xml: &str) -> Registry {
        parse_registry(xml.to_string()).unwrap()
    }

    #[test]
    fn parses_a_struct_member() {
        let registry = parse(
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

        let s = registry.find_type("S").unwrap();
        assert_eq!(s.category, TypeCategory::Struct);
        assert_eq!(s.members.len(), 1);
        assert_eq!(s.members[0].decl.type_name, "uint32_t");
        assert_eq!(s.members[0].decl.name, "x");
    }

    #[test]
    fn parses_array_enum_dimension() {
        let registry = parse(
            r#"<registry>
                <types>
                    <type category="struct" name="S">
                        <member><type>char</type> <name>name</name>[<enum>VK_MAX_EXTENSION_NAME_SIZE</enum>]</member>
                    </type>
                </types>
            </registry>"#,
        );
        let s = registry.find_type("S").unwrap();
        assert_eq!(
            s.members[0].decl.array_enum.as_deref(),
            Some("VK_MAX_EXTENSION_NAME_SIZE")
        );
    }

    #[test]
    fn skips_disabled_and_mir_extensions() {
        let registry = parse(
            r#"<registry>
                <extensions>
                    <extension name="VK_EXT_disabled" number="1" supported="disabled"/>
                    <extension name="VK_KHR_mir_surface" number="2" supported="vulkan" platform="mir"/>
                    <extension name="VK_KHR_ok" number="3" supported="vulkan"/>
                </extensions>
            </registry>"#,
        );
        assert_eq!(registry.extensions.len(), 1);
        assert_eq!(registry.extensions[0].name, "VK_KHR_ok");
    }

    #[test]
    fn deprecation_moves_deprecated_extension_after_deprecator() {
        let registry = parse(
            r#"<registry>
                <extensions>
                    <extension name="VK_EXT_old" number="1" supported="vulkan" deprecatedby="VK_EXT_new"/>
                    <extension name="VK_EXT_new" number="2" supported="vulkan"/>
                </extensions>
            </registry>"#,
        );
        let names: Vec<_> = registry.extensions.iter().map(|e| e.name.clone()).collect();
        assert_eq!(names, vec!["VK_EXT_new", "VK_EXT_old"]);
    }

    #[test]
    fn parses_extension_enum_value_fields() {
        let registry = parse(
            r#"<registry>
                <extensions>
                    <extension name="VK_KHR_foo" number="42" supported="vulkan">
                        <require>
                            <enum name="VK_SOMETHING_FOO" extends="VkSomeEnum" extnumber="42" offset="3" dir="-"/>
                        </require>
                    </extension>
                </extensions>
            </registry>"#,
        );
        let req_enum = &registry.extensions[0].requires[0].enums[0];
        assert_eq!(req_enum.extnumber, Some(42));
        assert_eq!(req_enum.offset, Some(3));
        assert!(req_enum.dir_negative);
    }

    #[test]
    fn handle_parent_chain_walks_to_instance() {
        let registry = parse(
            r#"<registry>
                <types>
                    <type category="handle" name="VkInstance" objtypeenum="VK_OBJECT_TYPE_INSTANCE"><type>VK_DEFINE_HANDLE</type><name>VkInstance</name></type>
                    <type category="handle" name="VkPhysicalDevice" parent="VkInstance" objtypeenum="VK_OBJECT_TYPE_PHYSICAL_DEVICE"><type>VK_DEFINE_HANDLE</type><name>VkPhysicalDevice</name></type>
                </types>
            </registry>"#,
        );
        assert!(registry.handle_is_descendant_of("VkPhysicalDevice", "VkInstance"));
        assert!(!registry.handle_is_descendant_of("VkInstance", "VkInstance"));
    }
}
