#![allow(dead_code)]

pub mod moodle_site;
