pub mod csv_history;
pub mod mock;
pub mod replay_feed;
pub mod simulated_feed;

pub use csv_history::CsvHistoryRepository;
pub use replay_feed::ReplayFeed;
pub use simulated_feed::SimulatedFeed;
