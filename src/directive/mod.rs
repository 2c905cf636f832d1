//! The `apipass` configuration directive.
//!
//! [`parse`] turns directive text into a [`BearerAuth`] gate that still needs
//! provisioning and validation before it can serve requests. The line-aware
//! scanner and token cursor live in [`Dispenser`]; the grammar itself lives
//! in `core`.
//!
//! [`BearerAuth`]: crate::middleware::bearer_auth::BearerAuth

mod core;
mod dispenser;
mod types;

pub use self::core::{DIRECTIVE, parse};
pub use self::dispenser::Dispenser;
pub use self::types::DirectiveError;
