//! Domain layer containing business entities and logic.
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`hit_event`] - Pending hit message
//! - [`hit_worker`] - Asynchronous hit persistence
//!
//! # Hit Processing Flow
//!
//! 1. A redirect resolves a code
//! 2. [`hit_worker::HitRecorder`] queues a [`hit_event::HitEvent`] without waiting
//! 3. [`hit_worker::run_hit_worker`] persists it with retry on transient failures
//! 4. Hits are counted via [`repositories::HitRepository::count_since`]

pub mod entities;
pub mod hit_event;
pub mod hit_worker;
pub mod repositories;
