pub mod add;
pub mod due;
pub mod preview;
pub mod review;
pub mod stats;
pub mod strength;
pub mod study;
pub mod undo;
