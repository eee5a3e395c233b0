//! Router Module Index
//!
//! Organizes the application's routing logic into security-segregated modules.
//! Access control is applied explicitly at the module level (via Axum layers),
//! preventing accidental exposure of protected endpoints. The server-side
//! policy layer is the only security boundary; anything the browser client
//! does with the token is cosmetic routing, not enforcement.

/// Routes accessible to all visitors: auth gateway, the filtered public
/// listing, the (deliberately unfiltered) detail view, and memory submission.
pub mod public;

/// Routes protected by the `AuthUser` extractor middleware.
/// Requires a validated token; ownership checks happen in the handlers.
pub mod authenticated;

/// Routes restricted to accounts carrying the admin flag.
pub mod admin;
