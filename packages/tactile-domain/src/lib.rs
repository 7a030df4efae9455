pub mod candidate;
pub mod fragments;
pub mod fusion;
pub mod fuzzy;
pub mod reorder;
