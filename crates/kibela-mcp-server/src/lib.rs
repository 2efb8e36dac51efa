pub mod cors;
pub mod dispatcher;
pub mod errors;
pub mod operations;
pub mod registry;
mod result;
pub mod server;
pub mod server_info;

#[cfg(test)]
pub(crate) mod testing;
