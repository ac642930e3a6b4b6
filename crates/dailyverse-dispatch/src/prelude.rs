pub use dailyverse_types::prelude::*;

// vim: ts=4
