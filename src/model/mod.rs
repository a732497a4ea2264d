pub mod attendance;
pub mod device;
pub mod role;
pub mod staff;
pub mod user;
