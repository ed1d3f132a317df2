pub mod action_result;
pub mod params;
pub mod ticket;
