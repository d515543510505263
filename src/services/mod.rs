pub mod enrichment;
pub mod player;
pub mod providers;
pub mod trending;
