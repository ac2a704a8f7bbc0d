pub mod finalizer;
pub mod handicap;
pub mod leaderboard;
pub mod metrics;
pub mod points;
pub mod ranking;
pub mod team;

pub use finalizer::*;
pub use handicap::*;
pub use leaderboard::*;
pub use metrics::*;
pub use points::*;
pub use ranking::*;
pub use team::*;
