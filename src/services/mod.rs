pub mod export_service;
pub mod lottery_service;

pub use lottery_service::LotteryService;
