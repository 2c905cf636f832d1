//! Grammar for the `apipass` directive.
//!
//! ```text
//! apipass {
//!     token "<value>"
//! }
//! ```
//!
//! The directive name takes no inline arguments. Inside the block, `token`
//! takes at most one value; repeating the subdirective keeps the last value,
//! and omitting the value leaves the token unset so that startup validation
//! rejects it.

use crate::directive::dispenser::Dispenser;
use crate::directive::types::DirectiveError;
use crate::middleware::bearer_auth::BearerAuth;

pub const DIRECTIVE: &str = "apipass";

/// Parse configuration text into an unprovisioned gate.
pub fn parse(input: &str) -> Result<BearerAuth, DirectiveError> {
    let mut d = Dispenser::new(input)?;
    let mut gate = BearerAuth::default();

    while d.next() {
        if d.val() != DIRECTIVE {
            return Err(DirectiveError::UnexpectedDirective {
                line: d.line(),
                expected: DIRECTIVE,
                found: d.val().to_string(),
            });
        }
        if d.next_arg() {
            return Err(d.arg_err());
        }
        while d.next_block() {
            match d.val() {
                "token" => {
                    if d.next_arg() {
                        gate.set_token(d.val());
                    }
                    if d.next_arg() {
                        return Err(d.arg_err());
                    }
                }
                other => {
                    return Err(DirectiveError::UnknownSubdirective {
                        line: d.line(),
                        name: other.to_string(),
                    });
                }
            }
        }
    }

    Ok(gate)
}
