pub mod neighbors;
pub mod recommendations;
pub mod report;
pub mod similarity;

pub use neighbors::top_similar_users;
pub use recommendations::{recommend, score_items, EngineDefaults, Recommender};
pub use similarity::cosine_similarity;
