pub mod locate;
pub mod pairs;
pub mod run;

pub use locate::*;
pub use pairs::*;
pub use run::*;
