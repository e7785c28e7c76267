//! High-level model wrapper.
//!
//! - [`CartConfig`]: validated training configuration (`bon` builder)
//! - [`CartModel`]: train a tree from a [`DataSource`](crate::data::DataSource)
//!   and predict with it
//!
//! # Example
//!
//! ```
//! use geocart::data::{Category, DataSource, DataTable};
//! use geocart::model::{CartConfig, CartModel};
//!
//! let table = DataTable::builder()
//!     .named_continuous("porosity", vec![0.05, 0.08, 0.21, 0.25])
//!     .named_categorical("facies", ["shale", "shale", "sand", "sand"])
//!     .build()
//!     .unwrap();
//!
//! let config = CartConfig::builder().class_column(1).build().unwrap();
//! let model = CartModel::train(&table, &[0], config).unwrap();
//!
//! let facies = model.tree().predict_category(&table.row(2)).unwrap();
//! assert_eq!(facies, Some(&Category::from("sand")));
//! ```

mod cart;
mod config;

pub use cart::CartModel;
pub use config::{CartConfig, CartConfigBuilder, ConfigError};
