// ZoeTrack core: League client phase monitor with auto-accept and ban/pick

pub mod champion_data;
pub mod config;
pub mod lcu;
pub mod lcu_watcher;
