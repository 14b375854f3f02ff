pub mod enums;
pub mod pagination;
pub mod response;

pub use pagination::*;
pub use response::*;
