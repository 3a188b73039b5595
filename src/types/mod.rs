//! Wire formats for the third-party JSON APIs.

pub mod covid;
pub mod rates;
