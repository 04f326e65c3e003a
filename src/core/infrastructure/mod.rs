pub mod api_client;
pub mod inventory;
pub mod memory_inventory;
pub mod response;
pub mod rest_inventory;
