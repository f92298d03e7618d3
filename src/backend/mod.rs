pub mod api_types;
pub mod cache;
pub mod cached_client;
pub mod client;
pub mod fixture;
pub mod http;
#[cfg(test)]
pub mod testing;
pub mod types;
