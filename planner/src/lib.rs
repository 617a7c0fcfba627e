//! StudyPlanner - weekly ENEM study plans
//!
//! Generates a six-day study schedule from daily hours and per-subject
//! difficulty, tracks completed days, and offers an end-of-week seminar once
//! the whole week is done. Plans live in a per-user document store, one
//! document per week.
//!
//! # Core Concepts
//!
//! - **Never empty-handed**: when the generative service keeps failing, a
//!   locally built plan is used instead
//! - **Optimistic persistence**: the screen reflects an action even if the
//!   write behind it failed; the failure is reported as a message
//! - **One document per week**: `users/{uid}/studyPlans/plan-{week}`
//!
//! # Modules
//!
//! - [`calendar`] - Exam countdown and seminar day
//! - [`catalog`] - Subjects, days and fallback topics
//! - [`domain`] - Plans, preferences and seminars
//! - [`generator`] - Generative client, retry and fallback plans
//! - [`gateway`] - Plan persistence over the document store
//! - [`session`] - Identity and store bootstrap
//! - [`controller`] - Application state machine
//! - [`view`], [`repl`], [`cli`] - Presentation

pub mod calendar;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod controller;
pub mod domain;
pub mod gateway;
pub mod generator;
pub mod repl;
pub mod session;
pub mod view;

pub use config::Config;
pub use controller::{Controller, ViewState};
pub use domain::{Difficulties, Preferences, StudyPlan};
