//! # Builders
//!
//! This module provides builder patterns for configuring session decoding.
//!
//! ## Modules
//!
//! - [`decoder_builder`] - Builder for [`SessionDecoder`](crate::decryptor::SessionDecoder)
//!
//! ## Usage
//!
//! Builders provide a fluent API with strict defaults: every protocol error aborts
//! the stream unless a recovery policy is opted into explicitly.

pub mod decoder_builder;
