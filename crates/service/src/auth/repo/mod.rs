//! Repository implementations backing `AuthRepository`.
pub mod seaorm;
