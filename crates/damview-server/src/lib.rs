//! Damview server
//!
//! Two surfaces in front of the tenant Asset Service:
//! - `/api/*` is reverse-proxied to the tenant host named by the `tenant`
//!   query parameter.
//! - `/token` (also `/api/token`) exchanges an OAuth2 authorization code for a
//!   token payload, adding the application credentials server-side.

mod handlers;
mod telemetry;

pub mod error;
pub mod setup;
pub mod state;
pub mod utils;

pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
