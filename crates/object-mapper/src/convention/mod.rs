//! Naming conventions and convention-based property discovery.
//!
//! - [`naming`]: convention policies (snake_case, camelCase, PascalCase,
//!   kebab-case) and their ordered registry
//! - [`similarity`]: Levenshtein and Soundex primitives
//! - [`mapper`]: dominant-convention detection and cached pair discovery

pub mod mapper;
pub mod naming;
pub mod similarity;

pub use mapper::{ConventionMapper, DEFAULT_THRESHOLD};
pub use naming::{
    CamelCaseConvention, ConventionRegistry, KebabCaseConvention, NamingConvention,
    PascalCaseConvention, SnakeCaseConvention,
};
pub use similarity::{edit_similarity, levenshtein, phonetic_similarity, soundex};
