//! Built-in calculators provided by the netlab library.

// Optical and transport budgets
pub mod download_time;
pub mod fiber_loss;

// Addressing and identifiers
pub mod mac_address;
pub mod subnet_hosts;

// Storage and availability
pub mod raid_capacity;
pub mod sla_downtime;

// Unit conversions
pub mod data_units;
pub mod power;
