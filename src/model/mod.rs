mod release;

pub use release::*;
