//! Statistical summaries used to report training progress.
//!
//! - [`descriptive`]: Descriptive statistics for summarizing datasets
//!
//! # Examples
//!
//! ```
//! use heurtris_stats::descriptive::DescriptiveStats;
//!
//! let fitness = [12.0, 30.5, 18.0, 7.5];
//! let stats = DescriptiveStats::new(fitness).unwrap();
//! assert_eq!(stats.max, 30.5);
//! assert_eq!(stats.median, 15.0);
//! ```

pub mod descriptive;
