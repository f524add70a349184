//! # Microblog
//!
//! A small blog-style web service. Users author posts, posts may belong to
//! a topical group, and anyone can browse paginated listings. Only a post's
//! author may edit it.
//!
//! ## Quick Start
//! ```bash
//! cargo run --bin microblog
//! ```
//!
//! ## Endpoints
//! - `GET /` - Paginated post list
//! - `GET /group/{slug}/` - Posts in a group
//! - `GET /profile/{username}/` - Posts by an author
//! - `GET /posts/{id}/` - Single post
//! - `GET|POST /create/` - New post (authenticated)
//! - `GET|POST /posts/{id}/edit/` - Edit post (author only)
//! - `GET /health` - Health check with metrics

pub mod auth;
pub mod config;
mod error;
pub mod forms;
mod handlers;
pub mod listing;
mod middleware;
pub mod models;
mod response;
mod router;
mod state;
pub mod store;

pub use config::Config;
pub use error::Error;
pub use router::create as create_router;
pub use state::AppState;
