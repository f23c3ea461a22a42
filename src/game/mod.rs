pub mod constants;
pub mod state;
pub mod pose;
pub mod systems;
pub mod step;
pub mod game_loop;
pub mod match_result;
pub mod performance;
