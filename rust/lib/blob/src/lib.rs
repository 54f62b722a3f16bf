pub mod error;
pub mod file;
pub mod sigv4;
pub mod spaces;
pub mod traits;

pub use error::BlobError;
pub use file::FileStore;
pub use spaces::{SpacesCredentials, SpacesStore};
pub use traits::BlobStore;
