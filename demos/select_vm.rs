use leeca_vsphere::{
    ClientConfig, DatasourceConfig, InMemoryInventory, SessionToken, SimulatedVm,
    VirtualMachineDatasource, VsphereResult,
};
use std::env;
use tracing_subscriber::EnvFilter;

/// Usage: `cargo run --example select_vm -- datasource.json`
///
/// With `VSPHERE_SESSION_ID` set, the filters run against the configured
/// vCenter. Otherwise a small simulated inventory is used.
#[tokio::main]
async fn main() -> VsphereResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("leeca_vsphere=debug")),
        )
        .init();

    let config = match env::args().nth(1) {
        Some(path) => DatasourceConfig::from_file(path).await?,
        None => DatasourceConfig {
            vcenter_server: "vcenter.example.com".to_string(),
            username: "administrator@vsphere.local".to_string(),
            password: "changeme".to_string(),
            name: "ubuntu-*".to_string(),
            template: true,
            latest: true,
            ..Default::default()
        },
    };
    let datasource = VirtualMachineDatasource::configure(config)?;

    let output = match env::var("VSPHERE_SESSION_ID") {
        Ok(session) => {
            let inventory = datasource
                .rest_inventory(SessionToken::new(session)?, ClientConfig::default())
                .await?;
            datasource.execute(&inventory).await?
        }
        Err(_) => {
            let inventory = InMemoryInventory::new([
                SimulatedVm::new("ubuntu-2204")
                    .template(true)
                    .created_at("2023-05-02T10:00:00Z".parse().unwrap_or_default()),
                SimulatedVm::new("ubuntu-2404")
                    .template(true)
                    .created_at("2024-05-02T10:00:00Z".parse().unwrap_or_default()),
                SimulatedVm::new("ubuntu-dev").tag("sandbox", "purpose"),
            ]);
            datasource.execute(&inventory).await?
        }
    };

    println!("Selected virtual machine: {}", output.vm_name);
    Ok(())
}
