//! # careline-session
//!
//! Client-side session and authentication manager for the Careline portal.
//! Tracks whether the current browser context is signed in, persists the
//! `{token, user}` pair across reloads, keeps sibling tabs in step, mediates
//! login/signup/verification against the identity service, and maps roles
//! to their landing areas.
//!
//! Browser-only pieces (`localStorage`, `storage` events, HTTP) are gated
//! behind the `hydrate` feature; everything else runs natively, which is how
//! the test suite drives it.

pub mod config;
pub mod net;
pub mod routing;
pub mod runtime;
pub mod state;
pub mod storage;
pub mod sync;
pub mod util;

pub use config::SessionConfig;
pub use net::error::{ClassifiedFailure, FailureKind, IdentityError};
pub use net::types::{Credentials, Registration, Role, User, Verification};
pub use routing::{LandingArea, landing_path};
pub use runtime::SessionRuntime;
pub use state::manager::{SessionManager, Subscription};
pub use state::session::{Session, SessionPhase};
