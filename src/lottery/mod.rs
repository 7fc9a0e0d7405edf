pub mod pool;
pub mod prize;

pub use pool::{DrawRecord, LotteryPool};
pub use prize::{PrizeTier, QuotaDecision, evaluate_draw_request};
