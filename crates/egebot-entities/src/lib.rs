pub mod exam_score;
pub mod user;
