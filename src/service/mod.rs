pub mod chart;
pub mod password;
