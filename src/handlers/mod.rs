// handlers/mod.rs - one module per resource
//
// Every handler follows the same shape: decode the query or body, make one
// routine call, relay the result. Request shapes live next to the handlers
// that decode them.

pub mod assignment;
pub mod auth;
pub mod bug;
pub mod health;
pub mod module;
pub mod project;
pub mod reference;
pub mod role;
pub mod sub_module;
pub mod utils;
pub mod work;
