pub mod clerk;

pub use clerk::Clerk;
