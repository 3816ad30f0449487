pub mod auction;
pub mod collect;
pub mod region;
pub mod rent;
pub mod subscription;
pub mod trades;

use clap::ValueEnum;

/// Property families served by the MOLIT RTMS endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PropertyType {
    /// Apartments
    Apt,
    /// Officetels
    Officetel,
    /// Row houses / multi-family (villa)
    Villa,
    /// Detached / single houses
    SingleHouse,
    /// Commercial buildings (sale only)
    Commercial,
}
