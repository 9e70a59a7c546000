#![cfg(feature = "std")]

use log::LevelFilter;
use tictactoe::{init_logging, level_from};

#[test]
fn level_parsing_falls_back_to_info() {
    assert_eq!(level_from(None), LevelFilter::Info);
    assert_eq!(level_from(Some("debug")), LevelFilter::Debug);
    assert_eq!(level_from(Some("off")), LevelFilter::Off);
    assert_eq!(level_from(Some("loud")), LevelFilter::Info);
}

#[test]
fn init_twice_is_harmless() {
    init_logging();
    init_logging();
    log::info!("logger installed");
}
