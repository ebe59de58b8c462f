//! # Folio JWT
//!
//! Signed, time-boxed assertions used to authenticate against the metrics
//! provider. A service account signs an RS256 JWT naming itself as issuer and
//! subject and the token endpoint as audience; the token endpoint trades it
//! for a short-lived bearer token.
//!
//! ## Example
//!
//! ```rust,ignore
//! use folio_jwt::{AssertionClaims, AssertionSigner, ASSERTION_TTL};
//!
//! let signer = AssertionSigner::rs256(&private_key_pem)?;
//! let claims = AssertionClaims::new(client_email, token_url, ASSERTION_TTL);
//! let assertion = signer.sign(&claims)?;
//! ```

pub mod claims;
pub mod token;

pub use claims::{ANALYTICS_READONLY_SCOPE, ASSERTION_TTL, AssertionClaims};
pub use token::{AssertionSigner, AssertionVerifier, JwtError, normalize_private_key};
