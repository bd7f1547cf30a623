pub mod interval;
pub mod obscore;
pub mod query;
pub mod shapes;
pub mod sky;
pub mod time;

pub use interval::*;
pub use obscore::*;
pub use query::*;
pub use shapes::*;
pub use time::*;
