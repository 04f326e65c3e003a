pub mod datasource_config;
pub mod datasource_output;
pub mod filter_config;
pub mod tag;
pub mod vm_candidate;
pub mod vsphere_connection;
