pub mod models;
pub mod collection;
pub mod intent;
pub mod errors;

pub use models::*;
pub use collection::*;
pub use intent::*;
pub use errors::*;
