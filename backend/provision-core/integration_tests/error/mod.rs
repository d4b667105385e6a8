mod data_warehouse;
mod provisioning;
