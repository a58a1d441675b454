pub mod evaluator;
pub mod fitness;

pub use evaluator::{Evaluation, Evaluator};
pub use fitness::{edit_distance, edit_distance_str};
