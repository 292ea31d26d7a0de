pub mod evaluate;
pub mod gentensor;
