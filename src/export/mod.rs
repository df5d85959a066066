/// Kotlin source generation for a loaded dataset
pub mod kotlin;
