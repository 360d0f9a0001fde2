use super::kind::{EntityKind, MethodScope};
use super::location::SourceLocation;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// A recognized syntactic unit of one source file.
///
/// Containers (class, category, extension, protocol) carry their own name in
/// `name`; members carry the bare selector or property name and point at the
/// enclosing container through `parent`, an index into the same unit's
/// declaration list.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, JsonSchema)]
pub struct Declaration {
    pub kind: EntityKind,
    #[schemars(with = "String")]
    pub name: SmolStr,
    /// Source text of the declaration header, whitespace collapsed.
    pub signature: String,
    pub location: SourceLocation,
    /// Blank lines between the previous token or comment and this declaration.
    pub blank_lines_before: usize,
    pub parent: Option<usize>,
    /// Attribute macros written before or after the declaration.
    #[schemars(with = "Vec<String>")]
    pub attributes: Vec<SmolStr>,
    pub detail: DeclarationDetail,
}

impl Declaration {
    pub fn is_deprecated_by_attribute(&self) -> bool {
        self.attributes
            .iter()
            .any(|a| a.to_ascii_lowercase().contains("deprecated"))
    }

    pub fn arguments(&self) -> &[ArgumentDecl] {
        match &self.detail {
            DeclarationDetail::Method(m) => &m.arguments,
            _ => &[],
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, JsonSchema)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DeclarationDetail {
    Class(ClassDecl),
    Category(CategoryDecl),
    Extension(CategoryDecl),
    Protocol(ProtocolDecl),
    Method(MethodDecl),
    Property(PropertyDecl),
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, JsonSchema)]
pub struct ClassDecl {
    #[schemars(with = "Option<String>")]
    pub superclass: Option<SmolStr>,
    #[schemars(with = "Vec<String>")]
    pub protocols: Vec<SmolStr>,
    /// Seen in an `@implementation` block rather than an `@interface`.
    pub implementation: bool,
}

/// Shared by categories and extensions; extensions have no category name.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, JsonSchema)]
pub struct CategoryDecl {
    #[schemars(with = "String")]
    pub class_name: SmolStr,
    #[schemars(with = "Option<String>")]
    pub category_name: Option<SmolStr>,
    #[schemars(with = "Vec<String>")]
    pub protocols: Vec<SmolStr>,
    pub implementation: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, JsonSchema)]
pub struct ProtocolDecl {
    #[schemars(with = "Vec<String>")]
    pub protocols: Vec<SmolStr>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, JsonSchema)]
pub struct MethodDecl {
    pub scope: MethodScope,
    pub return_type: Option<String>,
    pub arguments: Vec<ArgumentDecl>,
    pub variadic: bool,
    /// Declared under `@optional` inside a protocol.
    pub optional: bool,
    /// Has a body (`@implementation`).
    pub implementation: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, JsonSchema)]
pub struct ArgumentDecl {
    #[schemars(with = "String")]
    pub selector_part: SmolStr,
    pub type_name: Option<String>,
    #[schemars(with = "String")]
    pub name: SmolStr,
    pub line: usize,
    pub col: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, JsonSchema)]
pub struct PropertyDecl {
    pub type_name: String,
    #[schemars(with = "Vec<String>")]
    pub attributes: Vec<SmolStr>,
    pub optional: bool,
}
