pub mod expression;
pub mod params;
pub mod pick;
pub mod segment;

pub use expression::*;
pub use params::*;
pub use pick::*;
pub use segment::*;
