// Core helpers shared by every engine subsystem

pub mod math;
