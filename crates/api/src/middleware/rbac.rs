//! Permission-gated extractors.
//!
//! Each extractor verifies the bearer token via [`AuthUser`] and then rejects
//! the request with 403 unless the token carries the extractor's permission.
//! Put the extractor first in a handler's argument list: axum runs extractors
//! in order, so nothing else about the request is looked at until both checks
//! pass.
//!
//! ```ignore
//! async fn create(RequirePostMovies(user): RequirePostMovies, body: Bytes) -> AppResult<Json<()>> {
//!     // the caller holds `post:movies` here
//!     Ok(Json(()))
//! }
//! ```

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use casting_core::permissions::Permission;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

macro_rules! require_permission {
    ($(#[$meta:meta])* $name:ident => $permission:expr) => {
        $(#[$meta])*
        pub struct $name(pub AuthUser);

        impl $name {
            pub const PERMISSION: Permission = $permission;
        }

        impl FromRequestParts<AppState> for $name {
            type Rejection = AppError;

            async fn from_request_parts(
                parts: &mut Parts,
                state: &AppState,
            ) -> Result<Self, Self::Rejection> {
                let user = AuthUser::from_request_parts(parts, state).await?;
                user.permissions.require(Self::PERMISSION)?;
                tracing::debug!(
                    subject = %user.subject,
                    permission = %Self::PERMISSION,
                    "Permission granted"
                );
                Ok($name(user))
            }
        }
    };
}

require_permission!(
    /// Requires `get:movies`.
    RequireGetMovies => Permission::GetMovies
);
require_permission!(
    /// Requires `get:actors`.
    RequireGetActors => Permission::GetActors
);
require_permission!(
    /// Requires `post:movies`.
    RequirePostMovies => Permission::PostMovies
);
require_permission!(
    /// Requires `post:actors`.
    RequirePostActors => Permission::PostActors
);
require_permission!(
    /// Requires `delete:movies`.
    RequireDeleteMovies => Permission::DeleteMovies
);
require_permission!(
    /// Requires `delete:actors`.
    RequireDeleteActors => Permission::DeleteActors
);
require_permission!(
    /// Requires `patch:movies`.
    RequirePatchMovies => Permission::PatchMovies
);
require_permission!(
    /// Requires `patch:actors`.
    RequirePatchActors => Permission::PatchActors
);
