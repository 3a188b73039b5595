pub mod covid;
pub mod rates;
