//! # Tensor Backend
//!
//! Hands normalized samples to a tensor library. Each backend copies the
//! pixels once into its own storage; the sample is left untouched.
//!
//! ## Feature Flags
//!
//! - `candle`: Enables conversion into Candle tensors
//! - `burn`: Enables conversion into Burn tensors
//!
//! Both produce a rank 3 tensor of shape `[side, side, 3]` holding the
//! sample's pixels in the order the normalizer wrote them.

mod core_trait;

#[cfg_attr(docsrs, doc(cfg(feature = "candle")))]
#[cfg(feature = "candle")]
/// Candle tensor backend implementation.
///
/// This module is only available when the `candle` feature flag is enabled.
pub mod candle;

#[cfg_attr(docsrs, doc(cfg(feature = "burn")))]
#[cfg(feature = "burn")]
/// Burn tensor backend implementation.
///
/// This module is only available when the `burn` feature flag is enabled.
/// Only float tensors of rank 3 are produced.
pub mod burn;

pub use core_trait::*;
