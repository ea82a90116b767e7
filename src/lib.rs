pub mod clock;
pub mod config;
pub mod error;
pub mod game;
pub mod persist;
pub mod report;
pub mod roster;
pub mod season;
pub mod sim_feed;
pub mod stats;
pub mod tracker;
