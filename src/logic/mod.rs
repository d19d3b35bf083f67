//! Logic modules: the pure decision layer over the job document.
//!
//! Translates inventory contents and document flags into concrete
//! configuration writes. No I/O happens here; probing and persistence
//! live in `devices` and `job`.
//!
//! # Modules
//!
//! - `select`: compute backend selection (OptiX preferred, CUDA fallback)
//! - `denoise`: denoising detection and OpenImageDenoise enforcement

pub mod denoise;
pub mod select;
