pub use shakmaty;

pub mod annotation;
pub mod game;
pub mod policy;
