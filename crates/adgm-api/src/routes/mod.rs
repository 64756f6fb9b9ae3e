//! # Route Modules
//!
//! | Path                                 | Module        |
//! |--------------------------------------|---------------|
//! | `/`                                  | [`page`]      |
//! | `/v1/checklist`                      | [`checklist`] |
//! | `/v1/reviews`, `/v1/reviews/:id/...` | [`reviews`]   |

pub mod checklist;
pub mod page;
pub mod reviews;
