//! Client side of the fiche API.
//!
//! [`FicheClient`] wraps every endpoint. The remaining modules hold the
//! page logic that does not depend on rendering: list filters, the route
//! map, the content form and the systems list state.
//!
//! ```ignore
//! use radfiche_client::FicheClient;
//!
//! let client = FicheClient::new("http://localhost:5002");
//! let systems = client.list_systems().await?;
//! ```

mod api;
mod error;
mod filter;
mod form;
mod route;
mod view;

pub use api::FicheClient;
pub use error::ClientError;
pub use filter::{filter_by_name, filter_by_title, Named};
pub use form::{ContentForm, ImageFile};
pub use route::ClientRoute;
pub use view::{LoadState, SystemsView};
