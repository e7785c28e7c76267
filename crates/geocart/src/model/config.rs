//! Training configuration with builder pattern.
//!
//! [`CartConfig`] uses `bon` to generate a builder; the finishing `build()`
//! validates the result.
//!
//! # Example
//!
//! ```
//! use geocart::model::CartConfig;
//! use geocart::training::Verbosity;
//!
//! // Grow until pure, predicting column 3
//! let config = CartConfig::builder().class_column(3).build().unwrap();
//! assert_eq!(config.min_samples_split, 2);
//!
//! // Shallow tree, four threads
//! let config = CartConfig::builder()
//!     .class_column(3)
//!     .max_depth(4)
//!     .min_gain(0.01)
//!     .n_threads(std::num::NonZeroUsize::new(4).unwrap())
//!     .verbosity(Verbosity::Info)
//!     .build()
//!     .unwrap();
//! assert_eq!(config.max_depth, Some(4));
//! ```

use std::num::NonZeroUsize;

use bon::Builder;

use crate::data::ColumnId;
use crate::training::{BuilderParams, Verbosity};

// =============================================================================
// ConfigError
// =============================================================================

/// Errors raised when validating a [`CartConfig`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// A node needs at least two rows to be split.
    #[error("min_samples_split must be at least 2, got {0}")]
    InvalidMinSamplesSplit(usize),
    /// `min_gain` must be finite and non-negative.
    #[error("min_gain must be finite and non-negative, got {0}")]
    InvalidMinGain(f64),
}

// =============================================================================
// CartConfig
// =============================================================================

/// Configuration for [`CartModel::train`](super::CartModel::train).
#[derive(Debug, Clone, Builder)]
#[builder(
    derive(Clone, Debug),
    finish_fn(vis = "", name = __build_internal)
)]
pub struct CartConfig {
    /// Column to predict. Categorical gives a classification tree,
    /// continuous a regression tree.
    pub class_column: ColumnId,

    // === Stopping rules ===
    /// Maximum depth of split nodes. `None` grows until leaves are pure.
    pub max_depth: Option<u32>,

    /// Nodes with fewer rows become leaves. Default: 2.
    #[builder(default = 2)]
    pub min_samples_split: usize,

    /// A split must gain strictly more than this. Default: 0.0.
    #[builder(default = 0.0)]
    pub min_gain: f64,

    // === Resource control ===
    /// Number of threads. `None` builds sequentially.
    pub n_threads: Option<NonZeroUsize>,

    // === Logging ===
    /// Verbosity level. Default: `Silent`.
    #[builder(default)]
    pub verbosity: Verbosity,
}

impl<S: cart_config_builder::IsComplete> CartConfigBuilder<S> {
    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// - `min_samples_split < 2`
    /// - `min_gain` negative or not finite
    pub fn build(self) -> Result<CartConfig, ConfigError> {
        let config = self.__build_internal();
        config.validate()?;
        Ok(config)
    }
}

impl CartConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.min_samples_split < 2 {
            return Err(ConfigError::InvalidMinSamplesSplit(self.min_samples_split));
        }
        if !self.min_gain.is_finite() || self.min_gain < 0.0 {
            return Err(ConfigError::InvalidMinGain(self.min_gain));
        }
        Ok(())
    }

    /// Thread count for [`run_with_threads`](crate::utils::run_with_threads).
    #[inline]
    pub fn thread_count(&self) -> usize {
        self.n_threads.map_or(1, NonZeroUsize::get)
    }

    /// Stopping rules for the tree builder.
    pub fn to_builder_params(&self) -> BuilderParams {
        BuilderParams {
            class_column: self.class_column,
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            min_gain: self.min_gain,
        }
    }
}
