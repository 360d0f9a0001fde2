pub mod declaration;
pub mod diagnostic;
pub mod documentation;
pub mod entity;
pub mod kind;
pub mod language;
pub mod location;
pub mod naming;
pub mod source;
pub mod util;

pub use declaration::*;
pub use diagnostic::*;
pub use documentation::*;
pub use entity::*;
pub use kind::*;
pub use language::*;
pub use location::*;
pub use source::*;
