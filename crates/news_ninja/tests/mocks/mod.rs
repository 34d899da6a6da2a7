#![allow(dead_code)]

pub mod discussion;
pub mod feed;
pub mod model;
pub mod speech;
