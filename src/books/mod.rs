//! Books Module
//!
//! CRUD over the single `Book` resource. Handlers talk to a [`BookService`],
//! which forwards to whatever [`crate::store::BookStore`] was opened at
//! startup.
//!
//! # Usage
//!
//! ```rust,ignore
//! use shelf::books;
//!
//! let app = Router::new()
//!     .nest("/api/books", books::routes())
//!     .with_state(app_state);
//! ```

mod handler;
mod routes;
mod service;

pub use routes::routes;
pub use service::BookService;
