//! Command handlers organized by operation category.
//!
//! | Module | Commands |
//! |--------|----------|
//! | `document` | Find, Read, Create, Delete |
//! | `mutate` | Update |
//! | `array` | AppendWithIds, Inject, Duplicate, FindDuplicates, RemoveDuplicates, RemoveElement |
//! | `transfer` | Transfer |
//! | `admin` | Stats |

pub mod admin;
pub mod array;
pub mod document;
pub mod mutate;
pub mod transfer;
