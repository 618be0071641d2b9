mod pagination;
mod post;
mod related;
mod store;
mod tags;

pub use pagination::*;
pub use post::*;
pub use related::*;
pub use store::*;
pub use tags::*;
