use serde::{Deserialize, Serialize};

/// Output value of the virtual machine datasource.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DatasourceOutput {
    /// Name of the found virtual machine.
    pub vm_name: String,
}
