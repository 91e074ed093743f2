use wasm_bindgen::prelude::*;
use reel_engine::*;

mod show;
use show::MissionShowcase;

reel_web::export_show!(MissionShowcase, "mission-showcase");
