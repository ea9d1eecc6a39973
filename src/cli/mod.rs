pub mod docs;
pub mod schema;
pub mod validate;

pub use docs::DocsArgs;
pub use validate::ValidateArgs;
