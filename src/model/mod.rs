pub mod contact;
pub mod group;
pub mod pagination;

pub use contact::*;
pub use group::*;
pub use pagination::*;
