mod evaluator;

#[cfg(test)]
mod tests;

pub use evaluator::{HeaderMutation, HeaderMutations, HeaderTemplate};
