pub mod progress_utils;
pub mod report;
pub mod roster_gen;
pub mod test_utils;
