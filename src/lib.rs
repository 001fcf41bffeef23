#![allow(async_fn_in_trait)]

pub mod context;
pub mod estimation;
pub mod logs;
pub mod osu;
pub mod simulation;
pub mod time;
