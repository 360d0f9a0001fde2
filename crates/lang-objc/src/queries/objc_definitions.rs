decl_indices!(DefinitionIndices, {
    comment => "comment",
    class_interface => "class_interface",
    category_interface => "category_interface",
    class_implementation => "class_implementation",
    category_implementation => "category_implementation",
    protocol => "protocol",
    method => "method",
    method_definition => "method_definition",
    property => "property",
    error => "error",
});

impl DefinitionIndices {
    /// Captures naming `@interface`, `@implementation` and `@protocol` blocks.
    pub fn is_container(&self, index: u32) -> bool {
        [
            self.class_interface,
            self.category_interface,
            self.class_implementation,
            self.category_implementation,
            self.protocol,
        ]
        .contains(&index)
    }

    /// Captures naming methods and properties.
    pub fn is_member(&self, index: u32) -> bool {
        [self.method, self.method_definition, self.property].contains(&index)
    }
}

pub const OBJC_DEFINITIONS_SCM: &str = include_str!("objc_definitions.scm");
