//! Auth Module
//!
//! Client-credentials bearer token for the pricing API, cached in an explicit
//! object that handlers receive through application state.

mod token_cache;

pub use token_cache::{ClientCredentials, TokenCache};
