//! JSON REST API for the travels service.
//!
//! Exposes an axum [`Router`] backed by any [`travels_core::store::TravelStore`].
//! Collection names in the path are resolved to an
//! [`EntityKind`](travels_core::entity::EntityKind) by each handler, so one set
//! of routes serves users, locations and visits alike.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = travels_api::api_router(Arc::new(store));
//! ```

pub mod avg;
pub mod entities;
pub mod error;
pub mod resolve;
pub mod visits;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use travels_core::store::TravelStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: TravelStore + 'static,
{
  Router::new()
    .route("/{entity}", get(entities::list::<S>))
    .route("/{entity}/new", post(entities::create::<S>))
    .route(
      "/{entity}/{id}",
      get(entities::get_one::<S>)
        .post(entities::update_one::<S>)
        .delete(entities::delete_one::<S>),
    )
    // Derived reads; only `users` and `locations` respectively are served.
    .route("/{entity}/{id}/visits", get(visits::handler::<S>))
    .route("/{entity}/{id}/avg", get(avg::handler::<S>))
    .with_state(store)
}
