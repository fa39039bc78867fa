pub mod estimate;
pub mod evaluate;
pub mod summarize;
