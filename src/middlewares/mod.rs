pub mod trace;

pub use self::trace::*;
