pub mod acuity;
pub mod medication;
pub mod patient;

pub use acuity::*;
pub use medication::*;
pub use patient::*;
