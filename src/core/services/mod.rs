pub mod export;
pub mod quiz;
pub mod score;

#[cfg(test)]
pub mod mock;
