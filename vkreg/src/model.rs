//! In-memory representation of the registry (`spec.md` §3 / component A).
//!
//! Everything here is produced once by [`crate::parse`] and treated as
//! immutable by the rest of the pipeline, except for the extension list,
//! which the reorderer permutes in place.

use std::borrow::Cow;

/// String type used throughout the model. Most values borrow directly from
/// the (leaked) registry XML source; a few are synthesized during parsing
/// (e.g. trimmed attribute values) and own their storage.
pub type XmlStr = Cow<'static, str>;

#[derive(Debug, Clone)]
pub struct Platform {
    pub name: XmlStr,
    pub protect: XmlStr,
}

#[derive(Debug, Clone)]
pub struct Tag {
    pub name: XmlStr,
    pub author: XmlStr,
    pub contact: XmlStr,
}

/// The `category` discriminator on a `<type>` element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeCategory {
    Include,
    Define,
    BaseType,
    Handle,
    Bitmask,
    Enum,
    Struct,
    Union,
    FuncPointer,
    /// A `<type>` with no `category` attribute — a plain forward declaration.
    Plain,
}

impl TypeCategory {
    pub fn parse(raw: Option<&str>) -> TypeCategory {
        match raw {
            Some("include") => TypeCategory::Include,
            Some("define") => TypeCategory::Define,
            Some("basetype") => TypeCategory::BaseType,
            Some("handle") => TypeCategory::Handle,
            Some("bitmask") => TypeCategory::Bitmask,
            Some("enum") => TypeCategory::Enum,
            Some("struct") => TypeCategory::Struct,
            Some("union") => TypeCategory::Union,
            Some("funcpointer") => TypeCategory::FuncPointer,
            _ => TypeCategory::Plain,
        }
    }
}

/// A mixed-content type/name pair, as produced by the parser's
/// "accumulate until `<name>`" walk (`spec.md` §4.B).
#[derive(Debug, Clone, Default)]
pub struct TypeNamePair {
    /// The bare identifier inside the `<type>` child, if any.
    pub type_name: XmlStr,
    /// The full C-style type expression, assembled from mixed content.
    pub type_ctext: XmlStr,
    /// The bare identifier inside the `<name>` child.
    pub name: XmlStr,
    /// Everything from `<name>` onward (covers trailing array brackets).
    pub name_ctext: XmlStr,
    /// The `<enum>` child inside the name segment, used for fixed-size
    /// array dimensions like `[VK_MAX_EXTENSION_NAME_SIZE]`.
    pub array_enum: Option<XmlStr>,
}

/// A struct member, function-pointer parameter, or command parameter.
/// `spec.md` §3 describes these as sharing one shape.
#[derive(Debug, Clone)]
pub struct Member {
    pub decl: TypeNamePair,
    pub values: Option<XmlStr>,
    pub len: Vec<XmlStr>,
    pub altlen: Vec<XmlStr>,
    pub optional: Vec<XmlStr>,
}

#[derive(Debug, Clone)]
pub struct FuncPointerSig {
    pub return_type_ctext: XmlStr,
    pub params: Vec<Member>,
}

/// The union of all registry type-shaped entities.
#[derive(Debug, Clone)]
pub struct Type {
    pub name: XmlStr,
    pub category: TypeCategory,
    /// If set, this type is a forwarded alias; all other fields besides
    /// `name`/`category`/`requires` are meaningless.
    pub alias: Option<XmlStr>,
    pub requires: Option<XmlStr>,
    pub bitvalues: Option<XmlStr>,
    /// Handle parent (another handle type name).
    pub parent: Option<XmlStr>,
    pub members: Vec<Member>,
    pub funcpointer: Option<FuncPointerSig>,
    /// Verbatim textual value for `define`/`basetype`.
    pub verbatim: Option<XmlStr>,
    /// The object-macro name used to declare a `handle` (e.g.
    /// `VK_DEFINE_HANDLE`).
    pub handle_type: Option<XmlStr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumContainerKind {
    Enum,
    Bitmask,
    /// A standalone define-style `<enums>` block (`type=""`), such as the
    /// `API Constants` block. Always has exactly one item.
    Define,
}

#[derive(Debug, Clone)]
pub struct EnumItem {
    pub name: XmlStr,
    pub alias: Option<XmlStr>,
    pub value: Option<XmlStr>,
    pub bitpos: Option<u8>,
}

impl EnumItem {
    /// Exactly one of `alias`, `value`, `bitpos` is meaningful (`spec.md` §3).
    pub fn is_well_formed(&self) -> bool {
        let set = [
            self.alias.is_some(),
            self.value.is_some(),
            self.bitpos.is_some(),
        ];
        set.iter().filter(|b| **b).count() == 1
    }
}

#[derive(Debug, Clone)]
pub struct EnumContainer {
    pub name: XmlStr,
    pub kind: EnumContainerKind,
    pub items: Vec<EnumItem>,
}

#[derive(Debug, Clone)]
pub struct Command {
    pub name: XmlStr,
    pub alias: Option<XmlStr>,
    pub return_type_name: XmlStr,
    pub return_type_ctext: XmlStr,
    pub parameters: Vec<Member>,
    pub successcodes: Vec<XmlStr>,
    pub errorcodes: Vec<XmlStr>,
}

/// An extension field on a `Require.enums[]` entry that extends a
/// previously-declared enum container (`spec.md` §3, `Require`).
#[derive(Debug, Clone, Default)]
pub struct RequireEnum {
    pub name: XmlStr,
    pub extends: Option<XmlStr>,
    pub bitpos: Option<u8>,
    pub value: Option<XmlStr>,
    pub extnumber: Option<u32>,
    pub offset: Option<u32>,
    pub dir_negative: bool,
    pub alias: Option<XmlStr>,
}

#[derive(Debug, Clone, Default)]
pub struct Require {
    pub comment: Option<XmlStr>,
    pub types: Vec<XmlStr>,
    pub enums: Vec<RequireEnum>,
    pub commands: Vec<XmlStr>,
}

#[derive(Debug, Clone)]
pub struct Feature {
    pub api: XmlStr,
    pub name: XmlStr,
    /// e.g. `"1.0"`, `"1.2"`.
    pub number: XmlStr,
    pub requires: Vec<Require>,
}

#[derive(Debug, Clone)]
pub struct Extension {
    pub name: XmlStr,
    pub number: u32,
    pub ty: Option<XmlStr>,
    pub platform: Option<XmlStr>,
    pub supported: XmlStr,
    pub promotedto: Option<XmlStr>,
    pub deprecatedby: Option<XmlStr>,
    pub requires: Vec<Require>,
}

impl Extension {
    pub fn is_skipped(&self) -> bool {
        self.supported.split(',').any(|s| s == "disabled")
            || self.platform.as_deref() == Some("mir")
    }
}

/// The fully parsed registry. Constructed once by [`crate::parse`], then
/// treated as immutable except for `extensions`, which the reorderer
/// permutes in place.
#[derive(Debug, Default)]
pub struct Registry {
    pub platforms: Vec<Platform>,
    pub tags: Vec<Tag>,
    pub types: indexmap::IndexMap<&'static str, Type>,
    pub enum_containers: indexmap::IndexMap<&'static str, EnumContainer>,
    pub commands: indexmap::IndexMap<&'static str, Command>,
    pub features: Vec<Feature>,
    pub extensions: Vec<Extension>,
    /// Verbatim value of the `VK_HEADER_VERSION` define, used by the
    /// Revision/Version Derivation component (`spec.md` §4.H).
    pub header_version: Option<XmlStr>,
}

impl Registry {
    pub fn find_type(&self, name: &str) -> Option<&Type> {
        self.types.get(name)
    }

    pub fn find_command(&self, name: &str) -> Option<&Command> {
        self.commands.get(name)
    }

    pub fn find_enum_container(&self, name: &str) -> Option<&EnumContainer> {
        self.enum_containers.get(name)
    }

    pub fn find_extension(&self, name: &str) -> Option<&Extension> {
        self.extensions.iter().find(|e| e.name == name)
    }

    /// Walks a handle's `parent` chain looking for `ancestor`. `spec.md`
    /// §3 invariant: handle `parent` chains form a forest.
    pub fn handle_is_descendant_of(&self, child: &str, ancestor: &str) -> bool {
        if child == ancestor {
            return false;
        }
        match self.find_type(child) {
            Some(ty) if ty.category == TypeCategory::Handle => match &ty.parent {
                Some(parent) if parent == ancestor => true,
                Some(parent) => self.handle_is_descendant_of(parent, ancestor),
                None => false,
            },
            _ => false,
        }
    }
}
