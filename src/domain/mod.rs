pub mod admission;
pub mod clock;
pub mod hours;
pub mod ledger;
pub mod registry;
pub mod reservation;
