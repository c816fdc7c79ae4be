pub mod answers;
pub mod assessment;
pub mod dispatch;
pub mod ids;
pub mod score;
