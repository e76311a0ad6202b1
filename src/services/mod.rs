pub mod api_client;
pub mod form;
pub mod mapper;
pub mod permissions;
pub mod store;
