//! Kolb Tracker - Learning cycle journal with AI feedback.
//!
//! Users record learning cycles following Kolb's experiential learning model
//! (experience, reflection, conceptualization, experimentation), tag them
//! with skills and ask a language model for structured feedback.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
