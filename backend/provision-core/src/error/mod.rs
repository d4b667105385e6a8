pub mod assembly;
pub mod config;
pub mod data_warehouse;
pub mod output;
pub mod provisioning;
pub mod request;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Provisioning(#[from] provisioning::ProvisioningError),

    #[error(transparent)]
    Assembly(#[from] assembly::AssemblyError),

    #[error(transparent)]
    Request(#[from] request::RequestError),

    #[error(transparent)]
    DataWarehouse(#[from] data_warehouse::DataWarehouseError),

    #[error(transparent)]
    Output(#[from] output::OutputError),
}
