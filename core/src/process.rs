pub mod outcome;
pub mod runner;
#[cfg(any(test, feature = "testing"))]
pub mod scripted;

pub use outcome::*;
pub use runner::*;
#[cfg(any(test, feature = "testing"))]
pub use scripted::ScriptedExecutor;
