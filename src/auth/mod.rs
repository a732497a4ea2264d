//! Administrative account bootstrap. Request authentication is not handled
//! by this service.

pub mod password;
pub mod seed;
