pub mod access;
pub mod role;

pub use role::RequiredRole;
