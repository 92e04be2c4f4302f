pub mod declaration;
pub mod error;
pub mod keyword;
pub mod library;
pub mod property;
pub mod selector;
pub mod value;

pub use declaration::{StyleDeclaration, StyleProperties, StyleProperty};
pub use error::{Error, ParseError, RegistryError, Result};
pub use keyword::{KeywordId, KeywordRegistry};
pub use library::{SelectorHash, StyleEngine, StyleRule};
pub use property::{PropertyDef, PropertyKey, PropertyRegistry};
pub use selector::{Selector, SelectorNode, SELECTOR_MAX_DEPTH, SELECTOR_MAX_LEN};

// Re-export the value model at the crate root
pub use value::{ColorValue, CssUnit, FontFace, FontStyle, FontWeight, StyleValue, UnitValue};
pub use value::{ValueDef, ValueDefGroup, ValueDefSign, ValueParseFn, ValueTypeRecord};
