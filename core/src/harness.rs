pub mod category;
pub mod parser;

pub use category::*;
pub use parser::*;
