pub mod cancel;
pub mod shutdown;
pub mod utills;

pub use cancel::*;
pub use shutdown::*;
pub use utills::*;
