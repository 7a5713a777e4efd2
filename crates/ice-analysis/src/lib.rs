//! Cleaning, aggregation and comparison of video-game sales records
//!
//! This crate turns a noisy delimited dataset of game releases (one row per
//! title and platform) into a trustworthy analytical table, and answers
//! questions about it: which platforms sell, which years matter, and whether
//! two groups of titles are rated differently.
//!
//! # Overview
//!
//! The pipeline runs in a fixed order, each stage taking ownership of the
//! previous stage's table:
//!
//! 1. **Load** ([`loader::load_csv`]): read the source into a [`table::RawTable`]
//!    of untyped cells
//! 2. **Normalize** ([`normalize::normalize_columns`]): lower-case column names
//! 3. **Clean** ([`cleaning::clean`]): apply a [`policy::CleaningPolicy`] that
//!    drops, fills and coerces values column by column
//! 4. **Derive** ([`features::derive_features`]): add `total_sales`
//!
//! [`pipeline::load_and_prepare`] runs all four. The resulting
//! [`features::AnalysisTable`] is read-only from then on:
//!
//! - **Aggregate** ([`aggregate`]): sums, means, counts, extrema and
//!   distributions per [`dimension::Dimension`], plus top-N, shares and
//!   relative change
//! - **Window** ([`window`]): platform lifetimes and the recent years used for
//!   forward-looking analysis
//! - **Compare** ([`comparison`]): Bartlett's test followed by Welch's t-test
//!   between two groups
//! - **Report** ([`report::MarketReport`]): the complete study in one
//!   serializable value
//!
//! # Scores
//!
//! Critic and user scores are [`record::Score`] values. Sources mark a score
//! that was never given with `999` (or, for user scores, the token `tbd`);
//! that becomes [`record::Score::NotEvaluated`] and turns back into `999`
//! only when scores are used as plain numbers or exported.
//!
//! # Examples
//!
//! ```
//! use ice_analysis::{
//!     aggregate::group_sum,
//!     comparison::{ComparisonSpec, compare},
//!     dimension::{Dimension, GroupKey, Measure},
//!     loader::{LoaderOptions, read_csv},
//!     pipeline::prepare,
//!     policy::CleaningPolicy,
//! };
//!
//! let data = "\
//! Name,Platform,Year_of_Release,Genre,NA_sales,EU_sales,JP_sales,Other_sales,Critic_Score,User_Score,Rating
//! Halo 5,XOne,2015,Shooter,2.78,1.27,0.03,0.41,84,6.4,T
//! Forza 6,XOne,2015,Racing,0.89,0.83,0.01,0.14,87,7.7,E
//! Gears 4,XOne,2016,Shooter,1.61,0.66,0.01,0.25,84,6.2,M
//! Civ VI,PC,2016,Strategy,0.0,0.12,0.0,0.02,88,6.2,E10+
//! Doom,PC,2016,Shooter,0.0,0.08,0.0,0.01,85,8.4,M
//! Fallout 4,PC,2015,Role-Playing,0.51,0.67,0.0,0.1,84,5.4,M
//! ";
//! let raw = read_csv(data.as_bytes(), &LoaderOptions::default())?;
//! let table = prepare(raw, &CleaningPolicy::default())?;
//!
//! let sales = group_sum(&table, Dimension::Platform, Measure::TotalSales);
//! assert_eq!(sales.top_n(1).keys().next(), Some(&GroupKey::from("XOne")));
//!
//! let result = compare(&table, &ComparisonSpec::new(Dimension::Platform, "XOne", "PC"))?;
//! assert!(!result.reject_null);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod aggregate;
pub mod cleaning;
pub mod comparison;
pub mod config;
pub mod dimension;
pub mod export;
pub mod features;
pub mod loader;
pub mod normalize;
pub mod pipeline;
pub mod policy;
pub mod profile;
pub mod record;
pub mod report;
pub mod table;
pub mod window;
