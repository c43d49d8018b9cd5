pub mod asset;
pub mod contract;
pub mod method;
pub mod projection;
