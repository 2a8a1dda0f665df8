pub mod estimate;
pub mod ticket;
